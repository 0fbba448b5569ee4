//! Line-oriented edit scripts replayed against a document.

use markdown_blocks_engine::editing::{
    BlockEditor, BlockRect, Clipboard, Cmd, DropPosition, Key, KeyInput, MenuAction,
};
use markdown_blocks_engine::models::{Attributes, BlockType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: '{command}' is missing {what}")]
    MissingArgument {
        line: usize,
        command: &'static str,
        what: &'static str,
    },

    #[error("line {line}: unknown block type '{tag}'")]
    UnknownType { line: usize, tag: String },

    #[error("line {line}: expected 'before' or 'after', got '{value}'")]
    InvalidPosition { line: usize, value: String },

    #[error("line {line}: invalid JSON value: {source}")]
    InvalidJson {
        line: usize,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Plain editor command
    Apply(Cmd),
    /// Drag `source` onto `target` and drop it
    Move {
        source: String,
        target: String,
        position: DropPosition,
    },
    /// Open the block menu on `id` and pick `action`
    Menu { id: String, action: MenuAction },
    /// Open the add menu (optionally anchored) and pick `kind`
    Add { kind: BlockType, after: Option<String> },
}

/// Counts of what happened while replaying a script.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub changed: usize,
}

pub fn parse_script(text: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        steps.push(parse_line(index + 1, line)?);
    }
    Ok(steps)
}

fn parse_line(line: usize, text: &str) -> Result<Step, ScriptError> {
    let (command, rest) = split_word(text);
    let missing = |command: &'static str, what: &'static str| ScriptError::MissingArgument {
        line,
        command,
        what,
    };

    match command {
        "type" | "enter" | "space" | "backspace" => {
            let (id, body) = split_word(rest);
            if id.is_empty() {
                return Err(missing(static_name(command), "a block id"));
            }
            let id = id.to_string();
            let body = unescape(body);
            let cmd = match command {
                "type" => Cmd::UpdateContent { id, text: body },
                "enter" => Cmd::Key {
                    id,
                    input: KeyInput::at_end(Key::Enter, body),
                },
                "space" => Cmd::Key {
                    id,
                    input: KeyInput::at_end(Key::Space, body),
                },
                _ => Cmd::Key {
                    id,
                    input: KeyInput::at_start(Key::Backspace, body),
                },
            };
            Ok(Step::Apply(cmd))
        }
        "move" => {
            let (source, rest) = split_word(rest);
            let (position, rest) = split_word(rest);
            let (target, _) = split_word(rest);
            if source.is_empty() {
                return Err(missing("move", "a source id"));
            }
            let position = match position {
                "before" => DropPosition::Before,
                "after" => DropPosition::After,
                "" => return Err(missing("move", "a position")),
                other => {
                    return Err(ScriptError::InvalidPosition {
                        line,
                        value: other.to_string(),
                    });
                }
            };
            if target.is_empty() {
                return Err(missing("move", "a target id"));
            }
            Ok(Step::Move {
                source: source.to_string(),
                target: target.to_string(),
                position,
            })
        }
        "duplicate" | "delete" | "copy" => {
            let (id, _) = split_word(rest);
            if id.is_empty() {
                return Err(missing(static_name(command), "a block id"));
            }
            let action = match command {
                "duplicate" => MenuAction::Duplicate,
                "delete" => MenuAction::Delete,
                _ => MenuAction::CopyAsMarkdown,
            };
            Ok(Step::Menu {
                id: id.to_string(),
                action,
            })
        }
        "convert" => {
            let (id, rest) = split_word(rest);
            let (tag, _) = split_word(rest);
            if id.is_empty() {
                return Err(missing("convert", "a block id"));
            }
            let kind = parse_type(line, tag, "convert")?;
            Ok(Step::Menu {
                id: id.to_string(),
                action: MenuAction::ConvertTo(kind),
            })
        }
        "add" => {
            let (tag, rest) = split_word(rest);
            let (after, _) = split_word(rest);
            let kind = parse_type(line, tag, "add")?;
            Ok(Step::Add {
                kind,
                after: (!after.is_empty()).then(|| after.to_string()),
            })
        }
        "attr" => {
            let (id, rest) = split_word(rest);
            let (key, json) = split_word(rest);
            if id.is_empty() {
                return Err(missing("attr", "a block id"));
            }
            if key.is_empty() {
                return Err(missing("attr", "an attribute key"));
            }
            if json.is_empty() {
                return Err(missing("attr", "a JSON value"));
            }
            let value = serde_json::from_str(json)
                .map_err(|source| ScriptError::InvalidJson { line, source })?;
            let mut attributes = Attributes::new();
            attributes.insert(key.to_string(), value);
            Ok(Step::Apply(Cmd::UpdateAttributes {
                id: id.to_string(),
                attributes,
            }))
        }
        other => Err(ScriptError::UnknownCommand {
            line,
            command: other.to_string(),
        }),
    }
}

fn parse_type(line: usize, tag: &str, command: &'static str) -> Result<BlockType, ScriptError> {
    if tag.is_empty() {
        return Err(ScriptError::MissingArgument {
            line,
            command,
            what: "a block type",
        });
    }
    let kind = BlockType::from_tag(tag);
    if !kind.is_supported() {
        return Err(ScriptError::UnknownType {
            line,
            tag: tag.to_string(),
        });
    }
    Ok(kind)
}

fn static_name(command: &str) -> &'static str {
    match command {
        "type" => "type",
        "enter" => "enter",
        "space" => "space",
        "backspace" => "backspace",
        "duplicate" => "duplicate",
        "delete" => "delete",
        _ => "copy",
    }
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

/// `\n` in script text stands for a line break.
fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Replay steps through the editor the way the UI would drive it.
pub fn run(
    editor: &mut BlockEditor,
    steps: Vec<Step>,
    clipboard: &mut dyn Clipboard,
) -> RunSummary {
    let mut summary = RunSummary::default();
    for step in steps {
        summary.steps += 1;
        let changed = match step {
            Step::Apply(cmd) => editor.apply(cmd).changed,
            Step::Move {
                source,
                target,
                position,
            } => {
                let rect = BlockRect::new(0.0, 20.0);
                let client_y = match position {
                    DropPosition::Before => 5.0,
                    DropPosition::After => 15.0,
                };
                editor.apply(Cmd::DragStart { id: source.clone() });
                editor.apply(Cmd::DragOver {
                    target: target.clone(),
                    rect,
                    client_y,
                });
                editor
                    .apply(Cmd::Drop {
                        target,
                        source: Some(source),
                    })
                    .changed
            }
            Step::Menu { id, action } => {
                if editor.block(&id).is_none() {
                    log::warn!("no block {id} for {action:?}");
                    false
                } else {
                    editor.apply(Cmd::OpenBlockMenu { id });
                    editor.run_menu_action(action, clipboard).changed
                }
            }
            Step::Add { kind, after } => {
                editor.apply(Cmd::OpenAddMenu { anchor: after });
                editor.apply(Cmd::AddFromMenu { kind }).changed
            }
        };
        if changed {
            summary.changed += 1;
        }
    }
    summary
}

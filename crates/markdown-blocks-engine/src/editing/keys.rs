//! Keyboard-driven structural edits.
//!
//! [`interpret`] looks at a key press on a focused block and decides what the
//! document should do; it does not touch the document itself.

use crate::models::{Block, BlockType, ListKind};
use crate::parsing::shortcuts::{self, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Backspace,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Caret/selection within the block's rendered text, in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caret {
    /// Offset of the focus point from the start of the block text
    pub offset: usize,
    /// Whether the selection is a bare caret
    pub collapsed: bool,
}

impl Caret {
    pub fn collapsed_at(offset: usize) -> Self {
        Self {
            offset,
            collapsed: true,
        }
    }

    /// True when nothing lies between the caret and the end of `text`.
    pub fn is_at_end(&self, text: &str) -> bool {
        self.offset >= text.chars().count()
    }

    /// True when the caret is collapsed with nothing before it.
    pub fn is_at_start(&self) -> bool {
        self.collapsed && self.offset == 0
    }
}

/// A key press on a focused block.
///
/// `text` is the block's current rendered text, which may be ahead of the
/// stored content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
    pub text: String,
    pub caret: Caret,
}

impl KeyInput {
    pub fn new(key: Key, text: impl Into<String>, caret: Caret) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
            text: text.into(),
            caret,
        }
    }

    /// Key press with the caret collapsed at the end of `text`.
    pub fn at_end(key: Key, text: impl Into<String>) -> Self {
        let text = text.into();
        let caret = Caret::collapsed_at(text.chars().count());
        Self::new(key, text, caret)
    }

    /// Key press with the caret collapsed at the start of `text`.
    pub fn at_start(key: Key, text: impl Into<String>) -> Self {
        Self::new(key, text, Caret::collapsed_at(0))
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// What a key press does to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// Not ours; let the text editor handle it.
    Ignore,
    /// Retype the block in place. Default key handling still runs.
    Normalize(Block),
    /// Commit the current block and open a new one after it.
    Split {
        current: Block,
        /// Seed for the new block: a continued list, or a paragraph when `None`
        continue_list: Option<ListKind>,
    },
    /// Turn a structured block back into a paragraph carrying its marker text.
    Demote(Block),
}

impl KeyAction {
    /// Whether the platform's default handling of the key must be suppressed.
    pub fn prevents_default(&self) -> bool {
        matches!(self, KeyAction::Split { .. } | KeyAction::Demote(_))
    }
}

/// Decide what `input` does to `block`.
pub fn interpret(block: &Block, input: &KeyInput) -> KeyAction {
    if !block.kind.is_text() {
        return KeyAction::Ignore;
    }
    match input.key {
        Key::Enter | Key::Space if !block.kind.accepts_commit_keys() => KeyAction::Ignore,
        Key::Enter => enter(block, input),
        Key::Space => space(block, input),
        Key::Backspace => backspace(block, input),
        Key::Other => KeyAction::Ignore,
    }
}

fn with_text(block: &Block, text: &str) -> Block {
    let mut current = block.clone();
    current.content = text.to_string();
    current
}

fn enter(block: &Block, input: &KeyInput) -> KeyAction {
    if input.modifiers.shift || !input.caret.is_at_end(&input.text) {
        return KeyAction::Ignore;
    }
    let current = shortcuts::normalize_block(&with_text(block, &input.text), Mode::OnCommit);
    let continue_list = current.list_kind().map(ListKind::continuation);
    KeyAction::Split {
        current,
        continue_list,
    }
}

fn space(block: &Block, input: &KeyInput) -> KeyAction {
    let normalized = shortcuts::normalize_block(&with_text(block, &input.text), Mode::OnCommit);
    if normalized.kind == block.kind
        && normalized.attributes == block.attributes
        && normalized.content == block.content
    {
        return KeyAction::Ignore;
    }
    KeyAction::Normalize(normalized)
}

fn backspace(block: &Block, input: &KeyInput) -> KeyAction {
    if input.modifiers.any() {
        return KeyAction::Ignore;
    }
    if !(input.caret.is_at_start() || input.text.is_empty()) {
        return KeyAction::Ignore;
    }
    let prefix = match &block.kind {
        BlockType::List => ListKind::from_attributes(&block.attributes).text_prefix(),
        BlockType::Quote | BlockType::Callout => "> ".to_string(),
        _ => return KeyAction::Ignore,
    };
    let mut demoted = Block::paragraph(block.id.clone(), format!("{prefix}{}", input.text));
    demoted.attributes.clear();
    KeyAction::Demote(demoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn caret_end_detection_counts_chars() {
        assert!(Caret::collapsed_at(3).is_at_end("héé"));
        assert!(!Caret::collapsed_at(2).is_at_end("héé"));
        assert!(Caret::collapsed_at(0).is_at_end(""));
    }

    #[test]
    fn caret_start_requires_collapsed_selection() {
        assert!(Caret::collapsed_at(0).is_at_start());
        let range = Caret {
            offset: 0,
            collapsed: false,
        };
        assert!(!range.is_at_start());
    }

    #[test]
    fn enter_mid_text_is_ignored() {
        let block = Block::paragraph("a", "hello");
        let input = KeyInput::new(Key::Enter, "hello", Caret::collapsed_at(2));
        assert_eq!(interpret(&block, &input), KeyAction::Ignore);
    }

    #[test]
    fn shift_enter_is_ignored() {
        let block = Block::paragraph("a", "hello");
        let input = KeyInput::at_end(Key::Enter, "hello").with_modifiers(Modifiers {
            shift: true,
            ..Default::default()
        });
        assert_eq!(interpret(&block, &input), KeyAction::Ignore);
    }

    #[test]
    fn enter_on_ordered_marker_splits_and_continues() {
        let block = Block::paragraph("a", "1. first item");
        let action = interpret(&block, &KeyInput::at_end(Key::Enter, "1. first item"));
        assert_eq!(
            action,
            KeyAction::Split {
                current: Block::list("a", ListKind::Ordered { order: 1 }, "first item"),
                continue_list: Some(ListKind::Ordered { order: 2 }),
            }
        );
        assert!(action.prevents_default());
    }

    #[test]
    fn enter_on_plain_paragraph_opens_paragraph() {
        let block = Block::paragraph("a", "hello");
        let action = interpret(&block, &KeyInput::at_end(Key::Enter, "hello"));
        assert_eq!(
            action,
            KeyAction::Split {
                current: block.clone(),
                continue_list: None,
            }
        );
    }

    #[test]
    fn space_converts_marker_in_place() {
        let block = Block::paragraph("a", "-");
        let action = interpret(&block, &KeyInput::at_end(Key::Space, "- "));
        assert_eq!(
            action,
            KeyAction::Normalize(Block::list("a", ListKind::Unordered, ""))
        );
        assert!(!action.prevents_default());
    }

    #[test]
    fn space_on_unchanged_block_is_ignored() {
        let block = Block::paragraph("a", "hello ");
        assert_eq!(
            interpret(&block, &KeyInput::at_end(Key::Space, "hello ")),
            KeyAction::Ignore
        );
    }

    #[rstest]
    #[case(ListKind::Unordered, "- milk")]
    #[case(ListKind::Ordered { order: 4 }, "4. milk")]
    #[case(ListKind::Todo { checked: false }, "[ ] milk")]
    #[case(ListKind::Todo { checked: true }, "[x] milk")]
    fn backspace_demotes_list(#[case] kind: ListKind, #[case] expected: &str) {
        let block = Block::list("a", kind, "milk");
        let action = interpret(&block, &KeyInput::at_start(Key::Backspace, "milk"));
        assert_eq!(action, KeyAction::Demote(Block::paragraph("a", expected)));
    }

    #[rstest]
    #[case(BlockType::Quote, "wise", "> wise")]
    #[case(BlockType::Callout, "[!NOTE] hi", "> [!NOTE] hi")]
    fn backspace_demotes_quotes(
        #[case] kind: BlockType,
        #[case] content: &str,
        #[case] expected: &str,
    ) {
        let block = Block::new("q", kind, content);
        let action = interpret(&block, &KeyInput::at_start(Key::Backspace, content));
        assert_eq!(action, KeyAction::Demote(Block::paragraph("q", expected)));
    }

    #[test]
    fn backspace_on_empty_list_demotes_even_with_caret_elsewhere() {
        let block = Block::list("a", ListKind::Unordered, "");
        let input = KeyInput::new(
            Key::Backspace,
            "",
            Caret {
                offset: 0,
                collapsed: false,
            },
        );
        assert_eq!(
            interpret(&block, &input),
            KeyAction::Demote(Block::paragraph("a", "- "))
        );
    }

    #[test]
    fn backspace_cases_left_to_the_text_editor() {
        let list = Block::list("a", ListKind::Unordered, "milk");
        let mid = KeyInput::new(Key::Backspace, "milk", Caret::collapsed_at(2));
        assert_eq!(interpret(&list, &mid), KeyAction::Ignore);

        let with_ctrl = KeyInput::at_start(Key::Backspace, "milk").with_modifiers(Modifiers {
            ctrl: true,
            ..Default::default()
        });
        assert_eq!(interpret(&list, &with_ctrl), KeyAction::Ignore);

        let paragraph = Block::paragraph("p", "text");
        assert_eq!(
            interpret(&paragraph, &KeyInput::at_start(Key::Backspace, "text")),
            KeyAction::Ignore
        );
    }

    #[rstest]
    #[case(Key::Enter)]
    #[case(Key::Space)]
    fn quote_bodies_leave_enter_and_space_to_the_text_editor(#[case] key: Key) {
        let quote = Block::new("q", BlockType::Quote, "wise words");
        assert_eq!(
            interpret(&quote, &KeyInput::at_end(key, "wise words ")),
            KeyAction::Ignore
        );
    }

    #[test]
    fn enter_on_list_text_without_marker_becomes_paragraph() {
        let block = Block::list("a", ListKind::Ordered { order: 2 }, "second");
        assert_eq!(
            interpret(&block, &KeyInput::at_end(Key::Enter, "second")),
            KeyAction::Split {
                current: Block::paragraph("a", "second"),
                continue_list: None,
            }
        );
    }

    #[test]
    fn non_text_blocks_ignore_keys() {
        let image = Block::new("i", BlockType::Image, "");
        assert_eq!(
            interpret(&image, &KeyInput::at_end(Key::Enter, "")),
            KeyAction::Ignore
        );
    }
}

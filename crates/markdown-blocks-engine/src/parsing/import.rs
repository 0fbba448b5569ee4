//! Markdown → block sequence import.
//!
//! Line oriented: each non-blank line becomes one block via the on-commit
//! shortcut rules, except for fenced regions (code and `$$` math) and runs of
//! plain `>` quote lines, which are gathered into a single block.

use crate::models::{Block, BlockRegistry, BlockType, IdGenerator};
use crate::parsing::shortcuts::{self, Mode};

enum Fence {
    Code { marker: &'static str, language: String },
    Math,
}

fn fence_open(line: &str) -> Option<Fence> {
    let trimmed = line.trim();
    for marker in ["```", "~~~"] {
        if let Some(info) = trimmed.strip_prefix(marker) {
            return Some(Fence::Code {
                marker,
                language: info.trim().to_string(),
            });
        }
    }
    (trimmed == "$$").then_some(Fence::Math)
}

fn closes(fence: &Fence, line: &str) -> bool {
    let trimmed = line.trim();
    match fence {
        Fence::Code { marker, .. } => trimmed == *marker,
        Fence::Math => trimmed == "$$",
    }
}

/// Split Markdown text into a block sequence.
///
/// Never returns an empty sequence: blank input yields one empty paragraph.
pub fn import_markdown(
    text: &str,
    registry: &BlockRegistry,
    ids: &mut dyn IdGenerator,
) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut lines = text.lines().peekable();

    while let Some(line) = lines.next() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(fence) = fence_open(line) {
            let mut body = Vec::new();
            for inner in lines.by_ref() {
                if closes(&fence, inner) {
                    break;
                }
                body.push(inner);
            }
            let mut block = match fence {
                Fence::Code { language, .. } => {
                    let mut block = registry.create_initial_block(BlockType::Code, ids);
                    if !language.is_empty() {
                        block.attributes.insert("language".into(), language.into());
                    }
                    block
                }
                Fence::Math => registry.create_initial_block(BlockType::Math, ids),
            };
            block.content = body.join("\n");
            blocks.push(block);
            continue;
        }

        let mut block = Block::paragraph(ids.next_id(), line);
        block = shortcuts::normalize_block(&block, Mode::OnCommit);

        if block.kind == BlockType::Quote {
            while let Some(next) = lines.peek() {
                let next_block = shortcuts::normalize_block(
                    &Block::paragraph(String::new(), *next),
                    Mode::OnCommit,
                );
                if next_block.kind != BlockType::Quote {
                    break;
                }
                block.content.push('\n');
                block.content.push_str(&next_block.content);
                lines.next();
            }
        }

        blocks.push(block);
    }

    if blocks.is_empty() {
        blocks.push(registry.create_initial_block(BlockType::Paragraph, ids));
    }
    log::debug!("imported {} blocks from markdown", blocks.len());
    blocks
}

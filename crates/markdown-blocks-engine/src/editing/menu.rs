//! Block action menu and "add block" menu contents.

use thiserror::Error;

use crate::models::{Block, BlockRegistry, BlockType};

/// Types offered by "Convert to" and "Add block".
pub const MENU_BLOCK_TYPES: [BlockType; 8] = [
    BlockType::Paragraph,
    BlockType::Heading,
    BlockType::List,
    BlockType::Quote,
    BlockType::Callout,
    BlockType::Divider,
    BlockType::Image,
    BlockType::Html,
];

#[derive(Debug, Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

/// System clipboard access.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard kept in memory, for headless use.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Duplicate,
    Delete,
    CopyAsMarkdown,
    ConvertTo(BlockType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub action: MenuAction,
    pub label: String,
    pub enabled: bool,
}

/// Entries of the action menu for `block` in a document of `block_count` blocks.
///
/// Delete is disabled for the only remaining block.
pub fn block_menu_items(block: &Block, block_count: usize, registry: &BlockRegistry) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem {
            action: MenuAction::Duplicate,
            label: "Duplicate".into(),
            enabled: true,
        },
        MenuItem {
            action: MenuAction::Delete,
            label: "Delete".into(),
            enabled: block_count > 1,
        },
        MenuItem {
            action: MenuAction::CopyAsMarkdown,
            label: "Copy as Markdown".into(),
            enabled: true,
        },
    ];
    items.extend(
        MENU_BLOCK_TYPES
            .into_iter()
            .filter(|kind| *kind != block.kind)
            .map(|kind| MenuItem {
                label: format!("Turn into {}", registry.lookup(&kind).label),
                action: MenuAction::ConvertTo(kind),
                enabled: true,
            }),
    );
    items
}

/// Entries of the "add block" menu: `(type, label)` pairs.
pub fn add_menu_items(registry: &BlockRegistry) -> Vec<(BlockType, &'static str)> {
    MENU_BLOCK_TYPES
        .into_iter()
        .map(|kind| {
            let label = registry.lookup(&kind).label;
            (kind, label)
        })
        .collect()
}

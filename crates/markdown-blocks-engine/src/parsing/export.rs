//! Block → Markdown serialisation.

use serde_json::Value;
use thiserror::Error;

use crate::models::{Block, BlockType, ListKind};

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("block type `{0}` has no Markdown representation")]
    Unsupported(String),
    #[error("failed to encode block as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialises a single block to Markdown.
pub trait MarkdownSerializer {
    fn serialize(&self, block: &Block) -> Result<String, SerializeError>;
}

/// Serialiser covering the text-like and media block types.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMarkdownSerializer;

impl MarkdownSerializer for DefaultMarkdownSerializer {
    fn serialize(&self, block: &Block) -> Result<String, SerializeError> {
        let markdown = match &block.kind {
            BlockType::Paragraph => block.content.clone(),
            // Heading content keeps its `#` prefix
            BlockType::Heading => block.content.clone(),
            BlockType::List => list_item(block),
            BlockType::Quote | BlockType::Callout => prefix_lines(&block.content, "> "),
            BlockType::Divider => "---".to_string(),
            BlockType::Spacer => "<br>".to_string(),
            BlockType::Code => {
                let language = attr_str(block, "language").filter(|l| *l != "plaintext");
                format!("```{}\n{}\n```", language.unwrap_or(""), block.content)
            }
            BlockType::Math => format!("$$\n{}\n$$", block.content),
            BlockType::Image => format!(
                "![{}]({})",
                attr_str(block, "alt").unwrap_or(""),
                attr_str(block, "src").unwrap_or("")
            ),
            BlockType::Video | BlockType::Audio | BlockType::File => {
                let src = attr_str(block, "src").unwrap_or("");
                let label = attr_str(block, "name")
                    .filter(|name| !name.is_empty())
                    .unwrap_or(src);
                format!("[{label}]({src})")
            }
            BlockType::Bookmark => {
                let url = attr_str(block, "url").unwrap_or("");
                let title = if block.content.is_empty() {
                    url
                } else {
                    block.content.as_str()
                };
                format!("[{title}]({url})")
            }
            BlockType::Html => block.content.clone(),
            other => return Err(SerializeError::Unsupported(other.tag().to_string())),
        };
        Ok(markdown)
    }
}

fn attr_str<'a>(block: &'a Block, key: &str) -> Option<&'a str> {
    block.attributes.get(key).and_then(Value::as_str)
}

fn list_item(block: &Block) -> String {
    match ListKind::from_attributes(&block.attributes) {
        ListKind::Unordered => format!("- {}", block.content),
        ListKind::Ordered { order } => format!("{order}. {}", block.content),
        ListKind::Todo { checked } => {
            let mark = if checked { 'x' } else { ' ' };
            format!("- [{mark}] {}", block.content)
        }
    }
}

fn prefix_lines(content: &str, prefix: &str) -> String {
    if content.is_empty() {
        return prefix.trim_end().to_string();
    }
    content
        .lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Raw JSON form of a block, used when Markdown serialisation fails.
pub fn block_to_json(block: &Block) -> Result<String, SerializeError> {
    Ok(serde_json::to_string(block)?)
}

/// Serialise one block, falling back to its JSON form.
pub fn serialize_or_json(serializer: &dyn MarkdownSerializer, block: &Block) -> Option<String> {
    match serializer.serialize(block) {
        Ok(markdown) => Some(markdown),
        Err(e) => {
            log::warn!("markdown serialisation of block {} failed: {e}", block.id);
            match block_to_json(block) {
                Ok(json) => Some(json),
                Err(e) => {
                    log::warn!("json fallback for block {} failed: {e}", block.id);
                    None
                }
            }
        }
    }
}

/// Serialise a whole document, blocks separated by blank lines.
pub fn blocks_to_markdown(serializer: &dyn MarkdownSerializer, blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(|block| serialize_or_json(serializer, block))
        .collect::<Vec<_>>()
        .join("\n\n")
}

//! Block-type registry: what each block type supports and how a fresh block
//! of that type starts out.

use std::collections::HashMap;

use serde_json::Value;

use crate::models::{Attributes, Block, BlockType, IdGenerator, ListKind};

/// Capabilities of one block type.
#[derive(Debug, Clone)]
pub struct BlockSpec {
    /// Human-readable name for menus
    pub label: &'static str,
    /// Whether the block's editor emits content text (as opposed to only attributes)
    pub accepts_text: bool,
    default_attributes: fn() -> Attributes,
}

impl BlockSpec {
    pub fn default_attributes(&self) -> Attributes {
        (self.default_attributes)()
    }
}

/// Placeholder used for tags the registry does not know.
const UNSUPPORTED: BlockSpec = BlockSpec {
    label: "Unsupported block",
    accepts_text: false,
    default_attributes: no_attributes,
};

fn no_attributes() -> Attributes {
    Attributes::new()
}

fn heading_defaults() -> Attributes {
    attrs([("level", Value::from(1))])
}

fn list_defaults() -> Attributes {
    ListKind::Unordered.to_attributes()
}

fn code_defaults() -> Attributes {
    attrs([("language", Value::from("plaintext"))])
}

fn toggle_defaults() -> Attributes {
    attrs([("open", Value::from(false))])
}

fn spacer_defaults() -> Attributes {
    attrs([("height", Value::from(24))])
}

fn image_defaults() -> Attributes {
    attrs([("src", Value::from("")), ("alt", Value::from(""))])
}

fn media_defaults() -> Attributes {
    attrs([("src", Value::from(""))])
}

fn bookmark_defaults() -> Attributes {
    attrs([("url", Value::from(""))])
}

fn attrs<const N: usize>(pairs: [(&str, Value); N]) -> Attributes {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Maps block types to their [`BlockSpec`].
///
/// Lookups never fail: unknown or unregistered types resolve to the
/// "Unsupported block" placeholder.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    specs: HashMap<BlockType, BlockSpec>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        let mut specs = HashMap::new();
        for kind in BlockType::ALL {
            let spec = builtin_spec(&kind);
            specs.insert(kind, spec);
        }
        Self { specs }
    }
}

fn builtin_spec(kind: &BlockType) -> BlockSpec {
    let (label, accepts_text, default_attributes): (_, _, fn() -> Attributes) = match kind {
        BlockType::Paragraph => ("Text", true, no_attributes),
        BlockType::Heading => ("Heading", true, heading_defaults),
        BlockType::List => ("List", true, list_defaults),
        BlockType::Quote => ("Quote", true, no_attributes),
        BlockType::Callout => ("Callout", true, no_attributes),
        BlockType::Divider => ("Divider", false, no_attributes),
        BlockType::Spacer => ("Spacer", false, spacer_defaults),
        BlockType::Image => ("Image", false, image_defaults),
        BlockType::Video => ("Video", false, media_defaults),
        BlockType::Audio => ("Audio", false, media_defaults),
        BlockType::File => ("File", false, media_defaults),
        BlockType::Bookmark => ("Bookmark", false, bookmark_defaults),
        BlockType::Code => ("Code", true, code_defaults),
        BlockType::Math => ("Math", true, no_attributes),
        BlockType::Toggle => ("Toggle", true, toggle_defaults),
        BlockType::Table => ("Table", true, no_attributes),
        BlockType::TableOfContents => ("Table of contents", false, no_attributes),
        BlockType::Gallery => ("Gallery", false, no_attributes),
        BlockType::Board => ("Board", true, no_attributes),
        BlockType::Calendar => ("Calendar", true, no_attributes),
        BlockType::Html => ("HTML", true, no_attributes),
        BlockType::Unsupported(_) => return UNSUPPORTED,
    };
    BlockSpec {
        label,
        accepts_text,
        default_attributes,
    }
}

impl BlockRegistry {
    /// Registry without any types; everything resolves to the placeholder.
    pub fn empty() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    /// Register (or replace) the spec for a type.
    pub fn register(&mut self, kind: BlockType, spec: BlockSpec) {
        self.specs.insert(kind, spec);
    }

    pub fn is_registered(&self, kind: &BlockType) -> bool {
        self.specs.contains_key(kind)
    }

    pub fn lookup(&self, kind: &BlockType) -> &BlockSpec {
        match self.specs.get(kind) {
            Some(spec) => spec,
            None => {
                log::warn!("no editor registered for block type {kind}; using placeholder");
                &UNSUPPORTED
            }
        }
    }

    pub fn default_attributes(&self, kind: &BlockType) -> Attributes {
        self.lookup(kind).default_attributes()
    }

    /// A default-populated block of `kind` with a fresh id.
    pub fn create_initial_block(&self, kind: BlockType, ids: &mut dyn IdGenerator) -> Block {
        let attributes = self.default_attributes(&kind);
        Block::new(ids.next_id(), kind, "").with_attributes(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SequentialIds;

    #[test]
    fn every_known_type_is_registered() {
        let registry = BlockRegistry::default();
        for kind in BlockType::ALL {
            assert!(registry.is_registered(&kind), "{kind} missing");
        }
    }

    #[test]
    fn unknown_type_resolves_to_placeholder() {
        let registry = BlockRegistry::default();
        let spec = registry.lookup(&BlockType::Unsupported("kanban".into()));
        assert_eq!(spec.label, "Unsupported block");
        assert!(spec.default_attributes().is_empty());
    }

    #[test]
    fn create_initial_block_uses_defaults() {
        let registry = BlockRegistry::default();
        let mut ids = SequentialIds::new("b");

        let heading = registry.create_initial_block(BlockType::Heading, &mut ids);
        assert_eq!(heading.id, "b1");
        assert_eq!(heading.heading_level(), Some(1));
        assert!(heading.content.is_empty());

        let list = registry.create_initial_block(BlockType::List, &mut ids);
        assert_eq!(list.id, "b2");
        assert_eq!(list.list_kind(), Some(ListKind::Unordered));
    }

    #[test]
    fn registered_spec_can_be_replaced() {
        let mut registry = BlockRegistry::empty();
        assert_eq!(registry.lookup(&BlockType::Code).label, "Unsupported block");
        registry.register(BlockType::Code, builtin_spec(&BlockType::Code));
        assert_eq!(
            registry.default_attributes(&BlockType::Code)["language"],
            "plaintext"
        );
    }
}

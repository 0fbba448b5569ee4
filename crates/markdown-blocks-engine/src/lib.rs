pub mod editing;
pub mod models;
pub mod parsing;

// Re-export key types for easier usage
pub use editing::{BlockEditor, BlockStore, Cmd, Document, EditorOptions, Patch};
pub use models::{Attributes, Block, BlockRegistry, BlockType, ListKind};
pub use parsing::{DefaultMarkdownSerializer, MarkdownSerializer, import_markdown};

//! # Markdown handling
//!
//! - **`shortcuts`**: prefix-pattern autoconversion of a block's text into a
//!   typed block (headings, lists, quotes, callouts, dividers)
//! - **`export`**: block → Markdown serialisation with JSON fallback
//! - **`import`**: Markdown text → block sequence

pub mod export;
pub mod import;
pub mod shortcuts;

pub use export::{
    DefaultMarkdownSerializer, MarkdownSerializer, SerializeError, block_to_json,
    blocks_to_markdown, serialize_or_json,
};
pub use import::import_markdown;
pub use shortcuts::{Conversion, Mode, normalize_block};

//! Markdown-shortcut autoconversion.
//!
//! Decides, from a block's current type and raw text, whether the block should
//! be retyped and how its content/attributes are rewritten.
//!
//! Two strictness levels exist:
//!
//! - [`Mode::OnCommit`] (Enter, Space) runs the full rule set.
//! - [`Mode::WhileTyping`] (every keystroke) only runs the heading rule, so
//!   typing a literal `- ` mid-sentence does not turn a paragraph into a list.
//!
//! In both modes non-breaking spaces are replaced with plain spaces first, and
//! a heading whose text lost its `#` prefix drops back to a paragraph.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Attributes, Block, BlockType, ListKind};

/// Autoconversion strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    OnCommit,
    WhileTyping,
}

/// Outcome of running the rules over a block's text.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub kind: BlockType,
    pub content: String,
    pub attributes: Attributes,
}

impl Conversion {
    fn paragraph(content: impl Into<String>) -> Self {
        Self {
            kind: BlockType::Paragraph,
            content: content.into(),
            attributes: Attributes::new(),
        }
    }

    fn list(kind: ListKind, content: &str) -> Self {
        Self {
            kind: BlockType::List,
            content: content.to_string(),
            attributes: kind.to_attributes(),
        }
    }

    /// Write the conversion into `block`, keeping its id.
    pub fn apply_to(self, block: &mut Block) {
        block.kind = self.kind;
        block.content = self.content;
        block.attributes = self.attributes;
    }
}

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($re).expect("invalid shortcut regex"))
        }
    };
}

pattern!(heading_re, r"^(#{1,6})\s+\S");
pattern!(todo_re, r"(?s)^\[( |x|X)\]\s+(.*)");
pattern!(bullet_re, r"(?s)^[-*+]\s+(.*)");
pattern!(ordered_re, r"(?s)^(\d+)\.\s+(.*)");
pattern!(divider_re, r"^---+$");
pattern!(
    callout_re,
    r"(?i)^>\s*\[!(NOTE|WARNING|CALLOUT|TIP|CAUTION|IMPORTANT)\]"
);
pattern!(quote_re, r"(?s)^>\s+(.*)");
pattern!(quote_marker_re, r"^> ?");

/// Replace U+00A0 with a plain space.
pub fn normalize_spaces(text: &str) -> String {
    text.replace('\u{a0}', " ")
}

/// Heading level implied by a leading `#` run, if the text is a heading.
pub fn heading_level(text: &str) -> Option<u8> {
    heading_re()
        .captures(text.trim_start())
        .map(|caps| caps[1].len() as u8)
}

/// Run the shortcut rules for a block currently of type `current`.
///
/// Returns `None` when the block should be left exactly as it is.
pub fn convert(current: &BlockType, text: &str, mode: Mode) -> Option<Conversion> {
    let text = normalize_spaces(text);
    match mode {
        Mode::WhileTyping => convert_while_typing(current, &text),
        Mode::OnCommit => Some(convert_on_commit(&text)),
    }
}

fn convert_while_typing(current: &BlockType, text: &str) -> Option<Conversion> {
    if let Some(level) = heading_level(text) {
        return Some(heading(level, text));
    }
    if *current == BlockType::Heading {
        return Some(Conversion::paragraph(text));
    }
    None
}

fn convert_on_commit(text: &str) -> Conversion {
    let trimmed = text.trim_start();

    if trimmed.is_empty() {
        return Conversion::paragraph("");
    }

    if let Some(level) = heading_level(trimmed) {
        return heading(level, text);
    }

    if let Some(caps) = todo_re().captures(trimmed) {
        let checked = caps[1].eq_ignore_ascii_case("x");
        return Conversion::list(ListKind::Todo { checked }, &caps[2]);
    }

    if let Some(caps) = bullet_re().captures(trimmed) {
        return Conversion::list(ListKind::Unordered, &caps[1]);
    }

    if let Some(caps) = ordered_re().captures(trimmed) {
        let order = caps[1].parse::<u64>().unwrap_or(1).max(1);
        return Conversion::list(ListKind::Ordered { order }, &caps[2]);
    }

    if divider_re().is_match(trimmed.trim_end()) {
        return Conversion {
            kind: BlockType::Divider,
            content: String::new(),
            attributes: Attributes::new(),
        };
    }

    if callout_re().is_match(text) {
        return Conversion {
            kind: BlockType::Callout,
            content: quote_marker_re().replace(text, "").into_owned(),
            attributes: Attributes::new(),
        };
    }

    if let Some(caps) = quote_re().captures(trimmed) {
        return Conversion {
            kind: BlockType::Quote,
            content: caps[1].to_string(),
            attributes: Attributes::new(),
        };
    }

    unmatched(text)
}

/// No prefix rule matched: the block settles to a paragraph.
fn unmatched(text: &str) -> Conversion {
    Conversion::paragraph(text)
}

fn heading(level: u8, text: &str) -> Conversion {
    let mut attributes = Attributes::new();
    attributes.insert("level".into(), level.into());
    Conversion {
        kind: BlockType::Heading,
        content: text.to_string(),
        attributes,
    }
}

/// Apply the rules to a whole block.
///
/// Blocks that are not plain text (code, math, media, ...) are returned
/// untouched, so a `# ` inside a code block never retypes it.
pub fn normalize_block(block: &Block, mode: Mode) -> Block {
    let mut next = block.clone();
    if !block.kind.is_text() {
        return next;
    }
    match convert(&block.kind, &block.content, mode) {
        Some(conversion) => conversion.apply_to(&mut next),
        None => next.content = normalize_spaces(&block.content),
    }
    next
}

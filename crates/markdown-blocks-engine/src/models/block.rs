use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type-specific block metadata (heading level, list kind, etc.)
///
/// Insertion order is preserved so serialised blocks diff cleanly.
pub type Attributes = Map<String, Value>;

/// Block type tag.
///
/// The set of known tags is closed; anything else read from storage lands in
/// [`BlockType::Unsupported`] with the raw tag kept so it round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Paragraph,
    Heading,
    List,
    Quote,
    Callout,
    Divider,
    Spacer,
    Image,
    Video,
    Audio,
    File,
    Bookmark,
    Code,
    Math,
    Toggle,
    Table,
    TableOfContents,
    Gallery,
    Board,
    Calendar,
    Html,
    /// Tag not known to this editor
    Unsupported(String),
}

impl BlockType {
    /// Every known block type, in registry order.
    pub const ALL: [BlockType; 21] = [
        BlockType::Paragraph,
        BlockType::Heading,
        BlockType::List,
        BlockType::Quote,
        BlockType::Callout,
        BlockType::Divider,
        BlockType::Spacer,
        BlockType::Image,
        BlockType::Video,
        BlockType::Audio,
        BlockType::File,
        BlockType::Bookmark,
        BlockType::Code,
        BlockType::Math,
        BlockType::Toggle,
        BlockType::Table,
        BlockType::TableOfContents,
        BlockType::Gallery,
        BlockType::Board,
        BlockType::Calendar,
        BlockType::Html,
    ];

    /// Parse a stored tag. Unknown tags become `Unsupported`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "paragraph" => BlockType::Paragraph,
            "heading" => BlockType::Heading,
            "list" => BlockType::List,
            "quote" => BlockType::Quote,
            "callout" => BlockType::Callout,
            "divider" => BlockType::Divider,
            "spacer" => BlockType::Spacer,
            "image" => BlockType::Image,
            "video" => BlockType::Video,
            "audio" => BlockType::Audio,
            "file" => BlockType::File,
            "bookmark" => BlockType::Bookmark,
            "code" => BlockType::Code,
            "math" => BlockType::Math,
            "toggle" => BlockType::Toggle,
            "table" => BlockType::Table,
            "tableOfContents" => BlockType::TableOfContents,
            "gallery" => BlockType::Gallery,
            "board" => BlockType::Board,
            "calendar" => BlockType::Calendar,
            "html" => BlockType::Html,
            other => BlockType::Unsupported(other.to_string()),
        }
    }

    /// The tag as stored.
    pub fn tag(&self) -> &str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading => "heading",
            BlockType::List => "list",
            BlockType::Quote => "quote",
            BlockType::Callout => "callout",
            BlockType::Divider => "divider",
            BlockType::Spacer => "spacer",
            BlockType::Image => "image",
            BlockType::Video => "video",
            BlockType::Audio => "audio",
            BlockType::File => "file",
            BlockType::Bookmark => "bookmark",
            BlockType::Code => "code",
            BlockType::Math => "math",
            BlockType::Toggle => "toggle",
            BlockType::Table => "table",
            BlockType::TableOfContents => "tableOfContents",
            BlockType::Gallery => "gallery",
            BlockType::Board => "board",
            BlockType::Calendar => "calendar",
            BlockType::Html => "html",
            BlockType::Unsupported(tag) => tag,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, BlockType::Unsupported(_))
    }

    /// Types whose content is edited as plain text. Only these take part in
    /// shortcut autoconversion and Backspace demotion; every other type owns
    /// its content format.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            BlockType::Paragraph
                | BlockType::Heading
                | BlockType::List
                | BlockType::Quote
                | BlockType::Callout
        )
    }

    /// Whether Enter and Space are interpreted structurally for this type.
    pub fn accepts_commit_keys(&self) -> bool {
        matches!(
            self,
            BlockType::Paragraph | BlockType::Heading | BlockType::List
        )
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        BlockType::from_tag(&tag)
    }
}

impl From<BlockType> for String {
    fn from(kind: BlockType) -> Self {
        kind.tag().to_string()
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// List flavour stored in `attributes.kind` of a list block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    /// Numbered item, `order >= 1`
    Ordered { order: u64 },
    Todo { checked: bool },
}

impl ListKind {
    /// Read a list kind out of block attributes. Missing or malformed
    /// attributes fall back to an unordered list.
    pub fn from_attributes(attributes: &Attributes) -> Self {
        match attributes.get("kind").and_then(Value::as_str) {
            Some("ordered") => {
                let order = attributes
                    .get("order")
                    .and_then(Value::as_u64)
                    .unwrap_or(1)
                    .max(1);
                ListKind::Ordered { order }
            }
            Some("todo") => ListKind::Todo {
                checked: attributes
                    .get("checked")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
            _ => ListKind::Unordered,
        }
    }

    pub fn to_attributes(self) -> Attributes {
        let mut attributes = Attributes::new();
        match self {
            ListKind::Unordered => {
                attributes.insert("kind".into(), "unordered".into());
            }
            ListKind::Ordered { order } => {
                attributes.insert("kind".into(), "ordered".into());
                attributes.insert("order".into(), order.max(1).into());
            }
            ListKind::Todo { checked } => {
                attributes.insert("kind".into(), "todo".into());
                attributes.insert("checked".into(), checked.into());
            }
        }
        attributes
    }

    /// The kind a freshly created sibling continues with.
    pub fn continuation(self) -> Self {
        match self {
            ListKind::Unordered => ListKind::Unordered,
            ListKind::Ordered { order } => ListKind::Ordered {
                order: order.saturating_add(1),
            },
            ListKind::Todo { .. } => ListKind::Todo { checked: false },
        }
    }

    /// Literal Markdown-shortcut prefix that recreates this kind when typed.
    pub fn text_prefix(self) -> String {
        match self {
            ListKind::Unordered => "- ".to_string(),
            ListKind::Ordered { order } => format!("{order}. "),
            ListKind::Todo { checked: true } => "[x] ".to_string(),
            ListKind::Todo { checked: false } => "[ ] ".to_string(),
        }
    }
}

/// The atomic document unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique within a document, stable for the block's lifetime
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockType, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Shorthand for a paragraph block.
    pub fn paragraph(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, BlockType::Paragraph, content)
    }

    /// Shorthand for a list block of the given kind.
    pub fn list(id: impl Into<String>, kind: ListKind, content: impl Into<String>) -> Self {
        Self::new(id, BlockType::List, content).with_attributes(kind.to_attributes())
    }

    /// List kind for list blocks, `None` otherwise.
    pub fn list_kind(&self) -> Option<ListKind> {
        (self.kind == BlockType::List).then(|| ListKind::from_attributes(&self.attributes))
    }

    /// Heading level (1-6) for heading blocks, `None` otherwise.
    pub fn heading_level(&self) -> Option<u8> {
        if self.kind != BlockType::Heading {
            return None;
        }
        let level = self
            .attributes
            .get("level")
            .and_then(Value::as_u64)
            .unwrap_or(1)
            .clamp(1, 6);
        Some(level as u8)
    }
}

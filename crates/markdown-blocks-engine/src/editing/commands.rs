use crate::editing::drag::BlockRect;
use crate::editing::keys::KeyInput;
use crate::models::{Attributes, BlockType};

/// Every input the editor reacts to.
///
/// Document mutations and session (selection, drag, menu) updates both go
/// through [`BlockEditor::apply`](crate::editing::BlockEditor::apply).
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Text changed inside a block's editor
    UpdateContent { id: String, text: String },
    /// A block's editor changed some attributes
    UpdateAttributes { id: String, attributes: Attributes },
    InsertAfter {
        after: Option<String>,
        kind: BlockType,
    },
    Duplicate { id: String },
    Remove { id: String },
    Convert { id: String, kind: BlockType },
    /// Key pressed while `id` has focus
    Key { id: String, input: KeyInput },
    Select { id: String },
    Hover { id: Option<String> },
    DragStart { id: String },
    DragOver {
        target: String,
        rect: BlockRect,
        client_y: f64,
    },
    Drop {
        target: String,
        /// Source id carried by the drag payload, if any
        source: Option<String>,
    },
    DragEnd,
    DragLeave { still_inside: bool },
    OpenBlockMenu { id: String },
    OpenAddMenu { anchor: Option<String> },
    CloseMenu,
    /// Pick a type from the open "add block" menu
    AddFromMenu { kind: BlockType },
}

impl Cmd {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Cmd::UpdateContent { .. } => "update_content",
            Cmd::UpdateAttributes { .. } => "update_attributes",
            Cmd::InsertAfter { .. } => "insert_after",
            Cmd::Duplicate { .. } => "duplicate",
            Cmd::Remove { .. } => "remove",
            Cmd::Convert { .. } => "convert",
            Cmd::Key { .. } => "key",
            Cmd::Select { .. } => "select",
            Cmd::Hover { .. } => "hover",
            Cmd::DragStart { .. } => "drag_start",
            Cmd::DragOver { .. } => "drag_over",
            Cmd::Drop { .. } => "drop",
            Cmd::DragEnd => "drag_end",
            Cmd::DragLeave { .. } => "drag_leave",
            Cmd::OpenBlockMenu { .. } => "open_block_menu",
            Cmd::OpenAddMenu { .. } => "open_add_menu",
            Cmd::CloseMenu => "close_menu",
            Cmd::AddFromMenu { .. } => "add_from_menu",
        }
    }
}

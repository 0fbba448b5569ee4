/*!
 * # Block Editing Core
 *
 * A document is a non-empty ordered sequence of [`Block`](crate::models::Block)s.
 * The core never mutates it in place: every edit is a pure
 * `previous -> next` function handed to [`BlockStore::apply_blocks`], which is
 * where persistence, autosave batching or undo plug in.
 *
 * ## Module Structure
 *
 * - **`document`**: `BlockStore` seam and the in-memory `Document` with undo history
 * - **`ops`**: pure sequence transitions (insert, duplicate, remove, convert, move)
 * - **`keys`**: Enter/Space/Backspace interpretation (split, in-place retype, demotion)
 * - **`drag`**: drag session tracking and drop resolution
 * - **`menu`**: block action menu, "add block" menu, clipboard seam
 * - **`session`**: ephemeral selection/focus/drag/menu state
 * - **`commands`** / **`patch`**: `Cmd` input enum and `Patch` result
 * - **`editor`**: `BlockEditor`, tying the above together
 *
 * ## Usage Pattern
 *
 * ```rust
 * use markdown_blocks_engine::editing::*;
 * use markdown_blocks_engine::models::{Block, SequentialIds};
 *
 * let doc = Document::new(vec![Block::paragraph("a", "A"), Block::paragraph("b", "B")]);
 * let mut editor = BlockEditor::new(doc).with_id_generator(SequentialIds::new("n"));
 *
 * editor.apply(Cmd::DragStart { id: "a".into() });
 * editor.apply(Cmd::DragOver {
 *     target: "b".into(),
 *     rect: BlockRect::new(0.0, 20.0),
 *     client_y: 15.0,
 * });
 * let patch = editor.apply(Cmd::Drop { target: "b".into(), source: None });
 *
 * assert!(patch.changed);
 * assert_eq!(editor.blocks()[1].id, "a");
 * ```
 */

pub mod commands;
pub mod document;
pub mod drag;
pub mod editor;
pub mod keys;
pub mod menu;
pub mod ops;
pub mod patch;
pub mod session;

pub use commands::Cmd;
pub use document::{BlockStore, Document, DocumentError};
pub use drag::{BlockRect, ResolvedDrop};
pub use editor::{BlockEditor, EditorOptions};
pub use keys::{Caret, Key, KeyAction, KeyInput, Modifiers};
pub use menu::{Clipboard, ClipboardError, MENU_BLOCK_TYPES, MemoryClipboard, MenuAction, MenuItem};
pub use ops::DropPosition;
pub use patch::Patch;
pub use session::{DragOver, DragSession, EditorSession, MenuAnchor, PendingFocus};

//! Pointer drag-and-drop reordering.
//!
//! The gesture is tracked in a [`DragSession`]; a drop resolves to a single
//! [`move_block`](crate::editing::ops::move_block) transition.

use crate::editing::ops::DropPosition;
use crate::editing::session::{DragOver, DragSession};

/// Vertical extent of a block's bounding box, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockRect {
    pub top: f64,
    pub height: f64,
}

impl BlockRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Upper half → before, lower half → after.
    pub fn drop_position(&self, client_y: f64) -> DropPosition {
        if client_y < self.top + self.height / 2.0 {
            DropPosition::Before
        } else {
            DropPosition::After
        }
    }
}

/// A drop resolved to concrete ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDrop {
    pub source_id: String,
    pub target_id: String,
    pub position: DropPosition,
}

impl DragSession {
    /// Begin dragging `block_id`.
    pub fn start(&mut self, block_id: &str) {
        self.dragging_id = Some(block_id.to_string());
        self.over = None;
    }

    /// Pointer moved over `target_id`. Returns whether the hover info changed.
    ///
    /// Ignored without an active drag or when hovering the dragged block.
    pub fn drag_over(&mut self, target_id: &str, rect: BlockRect, client_y: f64) -> bool {
        match self.dragging_id.as_deref() {
            None => return false,
            Some(dragging) if dragging == target_id => return false,
            Some(_) => {}
        }
        let over = DragOver {
            target_id: target_id.to_string(),
            position: rect.drop_position(client_y),
        };
        if self.over.as_ref() == Some(&over) {
            return false;
        }
        self.over = Some(over);
        true
    }

    /// Resolve a drop on `target_id`.
    ///
    /// `transfer_source` is the id carried by the drag payload; the tracked
    /// dragging id is used when it is absent. The session is cleared either way.
    pub fn resolve_drop(
        &mut self,
        target_id: &str,
        transfer_source: Option<&str>,
    ) -> Option<ResolvedDrop> {
        let source = transfer_source
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.dragging_id.clone());
        let position = self
            .over
            .as_ref()
            .filter(|over| over.target_id == target_id)
            .map_or(DropPosition::Before, |over| over.position);
        self.clear();

        let Some(source_id) = source else {
            log::warn!("drop on {target_id} without a source block");
            return None;
        };
        if source_id == target_id {
            return None;
        }
        Some(ResolvedDrop {
            source_id,
            target_id: target_id.to_string(),
            position,
        })
    }

    /// Pointer left the editor. `still_inside` is true when it moved to a
    /// descendant, in which case nothing is cleared.
    pub fn leave(&mut self, still_inside: bool) {
        if !still_inside {
            self.clear();
        }
    }
}

//! Ephemeral per-editor UI state. Nothing here is ever persisted.

use std::time::{Duration, Instant};

use crate::editing::ops::DropPosition;

/// Default delay after which an unconsumed focus request is dropped.
pub const DEFAULT_FOCUS_CLEAR: Duration = Duration::from_millis(300);

/// A block that should receive input focus on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFocus {
    pub block_id: String,
    pub requested_at: Instant,
}

/// Latest pointer position over a candidate drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOver {
    pub target_id: String,
    pub position: DropPosition,
}

/// State of an in-progress drag gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragSession {
    pub dragging_id: Option<String>,
    pub over: Option<DragOver>,
}

impl DragSession {
    pub fn is_active(&self) -> bool {
        self.dragging_id.is_some()
    }

    pub fn clear(&mut self) {
        self.dragging_id = None;
        self.over = None;
    }
}

/// Which menu is open and what it is anchored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAnchor {
    /// Per-block action menu
    Block(String),
    /// "Add block" menu; `None` appends at the document end
    Add(Option<String>),
}

#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    pub selected: Option<String>,
    pub hovered: Option<String>,
    pub pending_focus: Option<PendingFocus>,
    pub drag: DragSession,
    pub menu: Option<MenuAnchor>,
}

impl EditorSession {
    pub fn request_focus(&mut self, block_id: &str, now: Instant) {
        self.pending_focus = Some(PendingFocus {
            block_id: block_id.to_string(),
            requested_at: now,
        });
    }

    /// The block awaiting focus, if any.
    pub fn focus_target(&self) -> Option<&str> {
        self.pending_focus.as_ref().map(|f| f.block_id.as_str())
    }

    /// Drop the focus request once `delay` has passed since it was made.
    pub fn clear_expired_focus(&mut self, now: Instant, delay: Duration) -> bool {
        let expired = self
            .pending_focus
            .as_ref()
            .is_some_and(|f| now.saturating_duration_since(f.requested_at) >= delay);
        if expired {
            self.pending_focus = None;
        }
        expired
    }

    /// Forget any state pointing at a block that no longer exists.
    pub fn forget_block(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        if self.focus_target() == Some(id) {
            self.pending_focus = None;
        }
        if matches!(&self.menu, Some(MenuAnchor::Block(anchor)) if anchor == id) {
            self.menu = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_clears_after_delay() {
        let mut session = EditorSession::default();
        let start = Instant::now();
        session.request_focus("a", start);

        assert!(!session.clear_expired_focus(start + Duration::from_millis(100), DEFAULT_FOCUS_CLEAR));
        assert_eq!(session.focus_target(), Some("a"));

        assert!(session.clear_expired_focus(start + DEFAULT_FOCUS_CLEAR, DEFAULT_FOCUS_CLEAR));
        assert_eq!(session.focus_target(), None);
    }

    #[test]
    fn forget_block_clears_references() {
        let mut session = EditorSession {
            selected: Some("a".into()),
            hovered: Some("a".into()),
            menu: Some(MenuAnchor::Block("a".into())),
            ..Default::default()
        };
        session.request_focus("a", Instant::now());
        session.forget_block("a");
        assert_eq!(session.selected, None);
        assert_eq!(session.hovered, None);
        assert_eq!(session.focus_target(), None);
        assert_eq!(session.menu, None);
    }
}

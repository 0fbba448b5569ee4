use std::time::{Duration, Instant};

use crate::editing::commands::Cmd;
use crate::editing::document::{BlockStore, Document};
use crate::editing::keys::{self, KeyAction, KeyInput};
use crate::editing::menu::{self, Clipboard, MenuAction, MenuItem};
use crate::editing::ops::{self, DropPosition};
use crate::editing::patch::Patch;
use crate::editing::session::{DEFAULT_FOCUS_CLEAR, EditorSession, MenuAnchor};
use crate::models::{
    Attributes, Block, BlockRegistry, BlockSpec, BlockType, IdGenerator, ShortIdGenerator,
};
use crate::parsing::export::{
    DefaultMarkdownSerializer, MarkdownSerializer, block_to_json, blocks_to_markdown,
    serialize_or_json,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    /// Reject every mutating command
    pub read_only: bool,
    /// How long an unconsumed focus request lives
    pub focus_clear: Duration,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            read_only: false,
            focus_clear: DEFAULT_FOCUS_CLEAR,
        }
    }
}

type SelectCallback = Box<dyn FnMut(&str)>;

/// Block document editor.
///
/// Owns a [`BlockStore`] plus the ephemeral [`EditorSession`]. Inputs arrive
/// as [`Cmd`]s; each one performs at most one store transition and reports
/// what happened in a [`Patch`].
///
/// ```rust
/// use markdown_blocks_engine::editing::{BlockEditor, Cmd, Document, Key, KeyInput};
/// use markdown_blocks_engine::models::{Block, BlockType, SequentialIds};
///
/// let doc = Document::new(vec![Block::paragraph("a", "")]);
/// let mut editor = BlockEditor::new(doc).with_id_generator(SequentialIds::new("n"));
///
/// editor.apply(Cmd::UpdateContent { id: "a".into(), text: "1. first".into() });
/// let patch = editor.apply(Cmd::Key {
///     id: "a".into(),
///     input: KeyInput::at_end(Key::Enter, "1. first"),
/// });
///
/// assert!(patch.prevent_default);
/// assert_eq!(patch.focus.as_deref(), Some("n1"));
/// assert_eq!(editor.blocks()[0].kind, BlockType::List);
/// assert_eq!(editor.blocks()[1].content, "");
/// ```
pub struct BlockEditor<S: BlockStore = Document> {
    store: S,
    registry: BlockRegistry,
    ids: Box<dyn IdGenerator>,
    serializer: Box<dyn MarkdownSerializer>,
    options: EditorOptions,
    session: EditorSession,
    on_select: Option<SelectCallback>,
}

impl<S: BlockStore> BlockEditor<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            registry: BlockRegistry::default(),
            ids: Box::new(ShortIdGenerator::default()),
            serializer: Box::new(DefaultMarkdownSerializer),
            options: EditorOptions::default(),
            session: EditorSession::default(),
            on_select: None,
        }
    }

    pub fn with_registry(mut self, registry: BlockRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_serializer(mut self, serializer: impl MarkdownSerializer + 'static) -> Self {
        self.serializer = Box::new(serializer);
        self
    }

    pub fn with_options(mut self, options: EditorOptions) -> Self {
        self.options = options;
        self
    }

    /// Called whenever the active block changes.
    pub fn on_select(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    pub fn blocks(&self) -> &[Block] {
        self.store.blocks()
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.store.blocks().iter().find(|b| b.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Registry entry used to render a block; unknown types get the
    /// "Unsupported block" placeholder.
    pub fn spec_for(&self, id: &str) -> Option<&BlockSpec> {
        self.block(id).map(|b| self.registry.lookup(&b.kind))
    }

    /// Whether the delete action is available for `id`.
    pub fn can_delete(&self, id: &str) -> bool {
        !self.options.read_only && self.block(id).is_some() && ops::can_remove(self.blocks())
    }

    /// Whole document as Markdown.
    pub fn to_markdown(&self) -> String {
        blocks_to_markdown(self.serializer.as_ref(), self.blocks())
    }

    /// Drop a pending focus request once it has outlived `focus_clear`.
    pub fn clear_expired_focus(&mut self, now: Instant) -> bool {
        self.session.clear_expired_focus(now, self.options.focus_clear)
    }

    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        self.apply_at(cmd, Instant::now())
    }

    /// Apply a command as if it happened at `now`.
    pub fn apply_at(&mut self, cmd: Cmd, now: Instant) -> Patch {
        log::debug!("cmd {}", cmd.name());
        let patch = self.dispatch(cmd, now);
        self.stamp(patch)
    }

    fn dispatch(&mut self, cmd: Cmd, now: Instant) -> Patch {
        match cmd {
            Cmd::UpdateContent { id, text } => {
                if !self.accepts_edits(&id) {
                    return Patch::none();
                }
                let changed = self.transition(|prev| ops::update_content(prev, &id, &text));
                changed_patch(changed)
            }
            Cmd::UpdateAttributes { id, attributes } => {
                if !self.accepts_edits(&id) {
                    return Patch::none();
                }
                let changed =
                    self.transition(|prev| ops::update_attributes(prev, &id, &attributes));
                changed_patch(changed)
            }
            Cmd::InsertAfter { after, kind } => self.insert_after(after.as_deref(), kind, now),
            Cmd::Duplicate { id } => self.duplicate(&id, now),
            Cmd::Remove { id } => self.remove(&id),
            Cmd::Convert { id, kind } => self.convert(&id, kind),
            Cmd::Key { id, input } => self.key(&id, &input, now),
            Cmd::Select { id } => {
                if self.block(&id).is_none() {
                    return Patch::none();
                }
                Patch {
                    selected: self.select(&id),
                    ..Patch::none()
                }
            }
            Cmd::Hover { id } => {
                self.session.hovered = id;
                Patch::none()
            }
            Cmd::DragStart { id } => {
                if self.options.read_only || self.block(&id).is_none() {
                    return Patch::none();
                }
                self.session.drag.start(&id);
                Patch {
                    selected: self.select(&id),
                    ..Patch::none()
                }
            }
            Cmd::DragOver {
                target,
                rect,
                client_y,
            } => {
                self.session.drag.drag_over(&target, rect, client_y);
                Patch::none()
            }
            Cmd::Drop { target, source } => self.drop(&target, source.as_deref()),
            Cmd::DragEnd => {
                self.session.drag.clear();
                Patch::none()
            }
            Cmd::DragLeave { still_inside } => {
                self.session.drag.leave(still_inside);
                Patch::none()
            }
            Cmd::OpenBlockMenu { id } => {
                if self.block(&id).is_some() {
                    self.session.menu = Some(MenuAnchor::Block(id));
                }
                Patch::none()
            }
            Cmd::OpenAddMenu { anchor } => {
                self.session.menu = Some(MenuAnchor::Add(anchor));
                Patch::none()
            }
            Cmd::CloseMenu => {
                self.session.menu = None;
                Patch::none()
            }
            Cmd::AddFromMenu { kind } => {
                let anchor = match self.session.menu.take() {
                    Some(MenuAnchor::Add(anchor)) => anchor,
                    other => {
                        self.session.menu = other;
                        return Patch::none();
                    }
                };
                self.insert_after(anchor.as_deref(), kind, now)
            }
        }
    }

    /// Items of the currently open block menu.
    pub fn menu_items(&self) -> Vec<MenuItem> {
        match &self.session.menu {
            Some(MenuAnchor::Block(id)) => self.menu_items_for(id),
            _ => Vec::new(),
        }
    }

    /// Run an action from the open block menu, then close it.
    pub fn run_menu_action(&mut self, action: MenuAction, clipboard: &mut dyn Clipboard) -> Patch {
        let Some(MenuAnchor::Block(id)) = self.session.menu.take() else {
            return Patch::none();
        };
        let enabled = self
            .menu_items_for(&id)
            .iter()
            .any(|item| item.action == action && item.enabled);
        if !enabled {
            log::debug!("menu action {action:?} disabled for {id}");
            return Patch::none();
        }
        let now = Instant::now();
        let patch = match action {
            MenuAction::Duplicate => self.duplicate(&id, now),
            MenuAction::Delete => self.remove(&id),
            MenuAction::CopyAsMarkdown => {
                self.copy_block_as_markdown(&id, clipboard);
                Patch::none()
            }
            MenuAction::ConvertTo(kind) => self.convert(&id, kind),
        };
        self.stamp(patch)
    }

    fn menu_items_for(&self, id: &str) -> Vec<MenuItem> {
        let Some(block) = self.block(id) else {
            return Vec::new();
        };
        let mut items = menu::block_menu_items(block, self.blocks().len(), &self.registry);
        if self.options.read_only {
            for item in &mut items {
                item.enabled = item.action == MenuAction::CopyAsMarkdown;
            }
        }
        items
    }

    /// Copy one block to the clipboard as Markdown.
    ///
    /// Falls back to the block's JSON when serialisation or the first write
    /// fails. Returns whether anything reached the clipboard.
    pub fn copy_block_as_markdown(&self, id: &str, clipboard: &mut dyn Clipboard) -> bool {
        let Some(block) = self.block(id) else {
            return false;
        };
        let Some(text) = serialize_or_json(self.serializer.as_ref(), block) else {
            return false;
        };
        match clipboard.write_text(&text) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("clipboard write failed for block {id}: {e}");
                let Ok(json) = block_to_json(block) else {
                    return false;
                };
                match clipboard.write_text(&json) {
                    Ok(()) => true,
                    Err(e) => {
                        log::warn!("clipboard json fallback failed for block {id}: {e}");
                        false
                    }
                }
            }
        }
    }

    fn stamp(&self, patch: Patch) -> Patch {
        Patch {
            version: self.store.version(),
            ..patch
        }
    }

    fn transition<F>(&mut self, updater: F) -> bool
    where
        F: FnOnce(&[Block]) -> Vec<Block>,
    {
        if self.options.read_only {
            log::debug!("read-only editor; transition skipped");
            return false;
        }
        self.store.apply_blocks(updater)
    }

    /// Content, attribute and key edits need a block the registry can edit.
    fn accepts_edits(&self, id: &str) -> bool {
        match self.block(id) {
            Some(block) if block.kind.is_supported() => true,
            Some(block) => {
                log::warn!("ignoring edit of unsupported block {id} ({})", block.kind);
                false
            }
            None => false,
        }
    }

    fn select(&mut self, id: &str) -> Option<String> {
        self.session.selected = Some(id.to_string());
        if let Some(callback) = self.on_select.as_mut() {
            callback(id);
        }
        Some(id.to_string())
    }

    fn focus(&mut self, id: &str, now: Instant) -> Option<String> {
        self.session.request_focus(id, now);
        Some(id.to_string())
    }

    /// Next generated id not already used by a block in the store.
    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            if self.block(&id).is_none() {
                return id;
            }
            log::debug!("generated id {id} already in use; skipping");
        }
    }

    fn new_block(&mut self, kind: BlockType) -> Block {
        let mut block = self.registry.create_initial_block(kind, self.ids.as_mut());
        if self.block(&block.id).is_some() {
            block.id = self.fresh_id();
        }
        block
    }

    fn insert_after(&mut self, after: Option<&str>, kind: BlockType, now: Instant) -> Patch {
        if self.options.read_only {
            return Patch::none();
        }
        let block = self.new_block(kind);
        let new_id = block.id.clone();
        let changed = self.transition(|prev| ops::insert_block_after(prev, after, block));
        if !changed {
            return Patch::none();
        }
        Patch {
            changed,
            selected: self.select(&new_id),
            focus: self.focus(&new_id, now),
            prevent_default: false,
            ..Patch::none()
        }
    }

    fn duplicate(&mut self, id: &str, now: Instant) -> Patch {
        if self.options.read_only || self.block(id).is_none() {
            return Patch::none();
        }
        let new_id = self.fresh_id();
        let copy_id = new_id.clone();
        let changed = self.transition(|prev| ops::duplicate_block(prev, id, copy_id));
        if !changed {
            return Patch::none();
        }
        Patch {
            changed,
            selected: self.select(&new_id),
            focus: self.focus(&new_id, now),
            prevent_default: false,
            ..Patch::none()
        }
    }

    fn remove(&mut self, id: &str) -> Patch {
        let changed = self.transition(|prev| ops::remove_block(prev, id));
        if changed {
            self.session.forget_block(id);
        }
        changed_patch(changed)
    }

    fn convert(&mut self, id: &str, kind: BlockType) -> Patch {
        let defaults: Attributes = self.registry.default_attributes(&kind);
        let changed = self.transition(|prev| ops::convert_block_type(prev, id, kind, defaults));
        changed_patch(changed)
    }

    fn key(&mut self, id: &str, input: &KeyInput, now: Instant) -> Patch {
        if self.options.read_only || !self.accepts_edits(id) {
            return Patch::none();
        }
        let Some(block) = self.block(id) else {
            return Patch::none();
        };
        let action = keys::interpret(block, input);
        let prevent_default = action.prevents_default();
        match action {
            KeyAction::Ignore => Patch::none(),
            KeyAction::Normalize(block) => {
                let changed = self.transition(|prev| ops::replace_block(prev, block));
                changed_patch(changed)
            }
            KeyAction::Split {
                current,
                continue_list,
            } => {
                let next = match continue_list {
                    Some(list_kind) => {
                        let mut next = self.new_block(BlockType::List);
                        next.attributes = list_kind.to_attributes();
                        next
                    }
                    None => self.new_block(BlockType::Paragraph),
                };
                let new_id = next.id.clone();
                let changed = self.transition(|prev| {
                    let committed = ops::replace_block(prev, current);
                    ops::insert_block_after(&committed, Some(id), next)
                });
                Patch {
                    changed,
                    selected: self.select(&new_id),
                    focus: self.focus(&new_id, now),
                    prevent_default,
                    ..Patch::none()
                }
            }
            KeyAction::Demote(block) => {
                let changed = self.transition(|prev| ops::replace_block(prev, block));
                Patch {
                    changed,
                    selected: self.select(id),
                    focus: self.focus(id, now),
                    prevent_default,
                    ..Patch::none()
                }
            }
        }
    }

    fn drop(&mut self, target: &str, source: Option<&str>) -> Patch {
        if self.options.read_only {
            self.session.drag.clear();
            return Patch::none();
        }
        let Some(resolved) = self.session.drag.resolve_drop(target, source) else {
            return Patch::none();
        };
        let both_present =
            self.block(&resolved.source_id).is_some() && self.block(&resolved.target_id).is_some();
        if !both_present {
            log::warn!(
                "drop of {} onto {} references a missing block",
                resolved.source_id,
                resolved.target_id
            );
            return Patch::none();
        }
        let changed = self.transition(|prev| {
            ops::move_block(
                prev,
                &resolved.source_id,
                &resolved.target_id,
                resolved.position,
            )
        });
        log::debug!(
            "moved {} {} {}",
            resolved.source_id,
            match resolved.position {
                DropPosition::Before => "before",
                DropPosition::After => "after",
            },
            resolved.target_id
        );
        Patch {
            changed,
            selected: self.select(&resolved.source_id),
            ..Patch::none()
        }
    }
}

fn changed_patch(changed: bool) -> Patch {
    Patch {
        changed,
        ..Patch::none()
    }
}

//! Per-instance editing engine.
//!
//! An [`Editor`] owns one document model, one event bus and one command
//! history. Several editors can coexist; nothing here is global.
//!
//! Input flows through the selection model first, then the drag or
//! placement engine, and every durable change ends up as a history entry.

use crate::bus::{DragSignal, EventBus};
use crate::config::EditorConfig;
use crate::document::{Block, Container, Document, DocumentModel};
use crate::drag::{DragSession, DragUpdate};
use crate::error::{EditorError, EditorResult};
use crate::history::{CommandArgs, CommandHistory, CommandName};
use crate::input::{KeyEvent, Modifiers, PointerEvent};
use crate::placement::{DropEffect, MenuDrag};
use crate::registry::{ComponentRegistry, FormData};
use crate::selection::{FocusSplit, Selection};
use crate::snap::Guides;
use kurbo::Point;
use std::rc::Rc;

/// The editing engine context for one mounted canvas.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    model: DocumentModel,
    bus: EventBus,
    history: CommandHistory,
    selection: Selection,
    drag: Option<DragSession>,
    menu: MenuDrag,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with an empty document sized from the config.
    pub fn new(config: EditorConfig) -> Self {
        let document = Document::new(config.default_container);
        Self::with_document(document, config)
    }

    /// Create an editor around an existing document.
    pub fn with_document(document: Document, config: EditorConfig) -> Self {
        let model = DocumentModel::new(document);
        let bus = EventBus::new();
        let history = CommandHistory::new(model.clone(), bus.clone()).with_limit(config.history_limit);
        log::info!("editor mounted ({} block(s))", model.current().len());
        Self {
            config,
            model,
            bus,
            history,
            selection: Selection::new(),
            drag: None,
            menu: MenuDrag::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The current document snapshot.
    pub fn document(&self) -> Rc<Document> {
        self.model.current()
    }

    /// Observable model, for renderers that repaint on change.
    pub fn model(&self) -> &DocumentModel {
        &self.model
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Mutable access, e.g. to register extra commands.
    pub fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }

    // ---- selection -------------------------------------------------------

    /// Indices of the focused blocks, in sequence order.
    pub fn focused_indices(&self) -> Vec<usize> {
        FocusSplit::of(&self.document()).focused_indices()
    }

    pub fn last_selected(&self) -> Option<usize> {
        self.selection.last_selected()
    }

    /// Copy of the last selected block, if it still exists.
    pub fn last_selected_block(&self) -> Option<Block> {
        self.selection.last_selected_block(&self.document()).cloned()
    }

    /// Click-select the block at `index`; `additive` is the shift modifier.
    pub fn select(&mut self, index: usize, additive: bool) -> bool {
        let document = self.document();
        match self.selection.select(&document, index, additive) {
            Some(next) => {
                self.history.publish_transient(next);
                true
            }
            None => false,
        }
    }

    pub fn clear_focus(&mut self) -> bool {
        let document = self.document();
        match self.selection.clear_focus(&document) {
            Some(next) => {
                self.history.publish_transient(next);
                true
            }
            None => false,
        }
    }

    pub fn is_preview(&self) -> bool {
        self.selection.is_preview()
    }

    /// Switch between editing and read-only preview. Either way the focus
    /// is cleared and any gesture in flight is abandoned.
    pub fn set_preview(&mut self, preview: bool) {
        self.drag = None;
        self.selection.set_preview(preview);
        let document = self.document();
        let next = self.selection.unfocus_all(&document);
        self.history.publish_transient(next);
        log::debug!("preview mode {}", if preview { "on" } else { "off" });
    }

    // ---- pointer ---------------------------------------------------------

    /// Route a pointer event. Returns the drag update for moves.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<DragUpdate> {
        match event {
            PointerEvent::DownOnBlock {
                index,
                position,
                modifiers,
            } => {
                self.pointer_down_on_block(index, position, modifiers);
                None
            }
            PointerEvent::DownOnCanvas { .. } => {
                self.clear_focus();
                None
            }
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => {
                self.pointer_up(position);
                None
            }
        }
    }

    /// Press on a block: select it, then arm a drag anchored on it.
    /// Returns whether a gesture started.
    pub fn pointer_down_on_block(&mut self, index: usize, position: Point, modifiers: Modifiers) -> bool {
        if !self.select(index, modifiers.shift) {
            return false;
        }
        // A shift-click can leave the anchor unfocused; no drag then.
        self.drag = DragSession::begin(&self.document(), index, position, self.config.snap_tolerance);
        self.drag.is_some()
    }

    /// Move the pointer. Only does something while a gesture is armed.
    pub fn pointer_move(&mut self, position: Point) -> Option<DragUpdate> {
        let session = self.drag.as_mut()?;
        let update = session.pointer_move(position);
        if update.started {
            log::debug!("drag started");
            self.bus.emit(DragSignal::Start);
        }
        let next = session.apply(&self.model.current(), update.delta);
        self.history.publish_transient(next);
        Some(update)
    }

    /// Release the pointer, ending the gesture. Returns whether the gesture
    /// moved anything (and so was recorded).
    pub fn pointer_up(&mut self, _position: Point) -> bool {
        self.settle_gesture()
    }

    /// End any armed gesture, recording it if it moved. Commands never run
    /// underneath a live drag.
    fn settle_gesture(&mut self) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        let moved = session.finish();
        if moved {
            log::debug!("drag ended");
            self.bus.emit(DragSignal::End);
            self.history.run_deferred();
        }
        moved
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(DragSession::is_dragging)
    }

    /// Alignment guides to draw right now.
    pub fn guides(&self) -> Guides {
        self.drag.as_ref().map(DragSession::guides).unwrap_or_default()
    }

    // ---- keyboard --------------------------------------------------------

    /// Dispatch a key press. Returns true when a shortcut matched and the
    /// platform default should be suppressed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if self.history.keymap().resolve(event).is_some() {
            self.settle_gesture();
        }
        let handled = self.history.handle_key(event);
        self.selection.revalidate(&self.document());
        handled
    }

    // ---- commands --------------------------------------------------------

    /// Invoke a registered command by name.
    pub fn invoke(&mut self, name: &str, args: CommandArgs) -> EditorResult<bool> {
        self.settle_gesture();
        let result = self.history.invoke(name, args);
        self.history.run_deferred();
        self.selection.revalidate(&self.document());
        result
    }

    fn invoke_builtin(&mut self, name: CommandName, args: CommandArgs) -> bool {
        match self.invoke(name.as_str(), args) {
            Ok(applied) => applied,
            Err(e) => {
                log::warn!("{} failed: {}", name, e);
                false
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        self.invoke_builtin(CommandName::Undo, CommandArgs::None)
    }

    pub fn redo(&mut self) -> bool {
        self.invoke_builtin(CommandName::Redo, CommandArgs::None)
    }

    /// Replace the whole document as one undoable step.
    pub fn update_container(&mut self, document: Document) -> bool {
        self.invoke_builtin(CommandName::UpdateContainer, CommandArgs::Document(document))
    }

    /// Resize the container as one undoable step.
    pub fn resize_container(&mut self, container: Container) -> bool {
        let next = self.document().with_container(container);
        self.update_container(next)
    }

    /// Replace the block at `index` as one undoable step.
    pub fn update_block(&mut self, index: usize, block: Block) -> bool {
        self.invoke_builtin(CommandName::UpdateBlock, CommandArgs::Block { index, block })
    }

    pub fn place_top(&mut self) -> bool {
        self.invoke_builtin(CommandName::PlaceTop, CommandArgs::None)
    }

    pub fn place_bottom(&mut self) -> bool {
        self.invoke_builtin(CommandName::PlaceBottom, CommandArgs::None)
    }

    /// Delete every focused block as one undoable step.
    pub fn delete_focused(&mut self) -> bool {
        self.invoke_builtin(CommandName::Delete, CommandArgs::None)
    }

    // ---- placement -------------------------------------------------------

    /// A component started dragging out of the menu.
    pub fn menu_drag_start(&mut self, key: impl Into<String>) {
        self.menu.start(key);
        self.bus.emit(DragSignal::Start);
    }

    pub fn drag_enter(&mut self) -> DropEffect {
        self.menu.drag_enter()
    }

    /// Returns whether the platform default must be prevented.
    pub fn drag_over(&self) -> bool {
        self.menu.drag_over()
    }

    pub fn drag_leave(&mut self) -> DropEffect {
        self.menu.drag_leave()
    }

    /// The dragged component was released over the canvas at `position`.
    pub fn drop_component(&mut self, position: Point) -> bool {
        let document = self.document();
        match self.menu.drop(&document, position, self.config.new_block_z_index) {
            Some(next) => {
                self.history.publish_transient(next);
                true
            }
            None => false,
        }
    }

    /// The menu drag finished. A drop made during it becomes one history
    /// entry here.
    pub fn menu_drag_end(&mut self) {
        if self.menu.end() {
            self.bus.emit(DragSignal::End);
            self.history.run_deferred();
        }
    }

    // ---- layout feedback -------------------------------------------------

    /// Record a block's rendered size. The first measurement of a freshly
    /// dropped block centres it on the drop point.
    pub fn block_measured(&mut self, index: usize, width: f64, height: f64) -> bool {
        let document = self.document();
        let Some(block) = document.block(index) else {
            return false;
        };
        let mut next = block.clone();
        if next.align_center {
            next.left -= width / 2.0;
            next.top -= height / 2.0;
            next.align_center = false;
        }
        next.width = width;
        next.height = height;
        if next == *block {
            return false;
        }
        let mut blocks = document.blocks.clone();
        blocks[index] = next;
        self.history.publish_transient(document.with_blocks(blocks));
        true
    }

    // ---- import / export -------------------------------------------------

    /// Replace the document with parsed JSON as one undoable step.
    /// Malformed input leaves document and history untouched.
    pub fn import_document(&mut self, json: &str) -> EditorResult<()> {
        let document = Document::from_json(json).inspect_err(|e| log::warn!("import rejected: {}", e))?;
        self.update_container(document);
        Ok(())
    }

    pub fn export_document(&self) -> EditorResult<String> {
        self.document().to_json()
    }

    /// Replace one block with parsed JSON as one undoable step.
    pub fn import_block(&mut self, index: usize, json: &str) -> EditorResult<bool> {
        let block: Block = serde_json::from_str(json).map_err(|e| {
            log::warn!("block import rejected: {}", e);
            EditorError::MalformedImport(e.to_string())
        })?;
        Ok(self.update_block(index, block))
    }

    /// JSON for one block, `None` if the index is stale.
    pub fn export_block(&self, index: usize) -> EditorResult<Option<String>> {
        let document = self.document();
        document
            .block(index)
            .map(|block| serde_json::to_string(block).map_err(EditorError::from))
            .transpose()
    }

    // ---- rendering -------------------------------------------------------

    /// Render one block through the registry. `None` for a stale index or a
    /// key with no registered component.
    pub fn render_block(&self, index: usize, registry: &ComponentRegistry, form: &FormData) -> Option<String> {
        let document = self.document();
        let block = document.block(index)?;
        registry.render(block, form)
    }

    /// Detach every engine-scoped listener. The editor stays readable.
    pub fn dispose(&mut self) {
        self.drag = None;
        self.menu.end();
        self.history.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(left: f64, top: f64) -> Block {
        Block::new("text", top, left).with_size(50.0, 30.0)
    }

    /// Two draggable blocks and one far-away neighbour.
    fn editor() -> Editor {
        let document = Document::new(Container::default()).with_blocks(vec![
            block(100.0, 100.0),
            block(300.0, 140.0),
            block(600.0, 400.0),
        ]);
        Editor::with_document(document, EditorConfig::default())
    }

    fn tops(editor: &Editor) -> Vec<f64> {
        editor.document().blocks.iter().map(|b| b.top).collect()
    }

    #[test]
    fn test_multi_drag_is_one_entry() {
        let mut editor = editor();
        editor.select(0, false);
        editor.select(1, true);
        assert!(editor.pointer_down_on_block(0, Point::new(110.0, 110.0), Modifiers::NONE));

        editor.pointer_move(Point::new(110.0, 120.0));
        editor.pointer_move(Point::new(110.0, 130.0));
        assert!(editor.is_dragging());
        assert!(editor.pointer_up(Point::new(110.0, 130.0)));

        assert_eq!(tops(&editor), vec![120.0, 160.0, 400.0]);
        assert_eq!(editor.history().len(), 1);
        assert_eq!(editor.history().entry_names(), vec!["drag"]);

        assert!(editor.undo());
        assert_eq!(tops(&editor), vec![100.0, 140.0, 400.0]);
    }

    #[test]
    fn test_drag_snaps_to_neighbour() {
        let mut editor = editor();
        editor.pointer_down_on_block(0, Point::new(100.0, 100.0), Modifiers::NONE);
        let update = editor.pointer_move(Point::new(100.0, 404.0)).unwrap();
        assert_eq!(update.guides.y, Some(400.0));
        assert_eq!(editor.guides().y, Some(400.0));
        assert_eq!(editor.document().blocks[0].top, 400.0);
        editor.pointer_up(Point::new(100.0, 404.0));
        assert!(editor.guides().is_empty());
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let mut editor = editor();
        editor.pointer_down_on_block(1, Point::new(300.0, 140.0), Modifiers::NONE);
        assert!(!editor.pointer_up(Point::new(300.0, 140.0)));
        assert!(editor.history().is_empty());
        assert_eq!(editor.focused_indices(), vec![1]);
        assert_eq!(editor.last_selected(), Some(1));
    }

    #[test]
    fn test_shortcut_mid_drag_ends_the_gesture() {
        let mut editor = editor();
        editor.select(0, false);
        editor.select(1, true);
        editor.pointer_down_on_block(0, Point::new(100.0, 100.0), Modifiers::NONE);
        editor.pointer_move(Point::new(100.0, 120.0));

        assert!(editor.handle_key(&KeyEvent::ctrl("Delete")));
        assert!(!editor.is_dragging());
        assert!(editor.pointer_move(Point::new(37.0, 53.0)).is_none());
        assert!(!editor.pointer_up(Point::new(37.0, 53.0)));

        let remaining = editor.document().blocks[0].clone();
        assert_eq!((remaining.left, remaining.top), (600.0, 400.0));
        assert_eq!(editor.history().entry_names(), vec!["drag", "delete"]);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut editor = editor();
        assert!(editor.pointer_move(Point::new(5.0, 5.0)).is_none());
        assert!(!editor.pointer_up(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_canvas_press_clears_focus() {
        let mut editor = editor();
        editor.select(0, false);
        editor.handle_pointer(PointerEvent::DownOnCanvas {
            position: Point::new(1.0, 1.0),
        });
        assert!(editor.focused_indices().is_empty());
        assert_eq!(editor.last_selected(), None);
    }

    #[test]
    fn test_preview_blocks_selection_and_drag() {
        let mut editor = editor();
        editor.select(0, false);
        editor.set_preview(true);
        assert!(editor.focused_indices().is_empty());
        assert!(!editor.pointer_down_on_block(1, Point::ZERO, Modifiers::NONE));
        assert!(editor.focused_indices().is_empty());

        editor.set_preview(false);
        assert!(editor.select(1, false));
    }

    #[test]
    fn test_place_top_and_delete_via_keyboard() {
        let mut editor = editor();
        editor.select(0, false);
        assert!(editor.place_top());
        assert_eq!(editor.document().blocks[0].z_index, 2);

        assert!(editor.handle_key(&KeyEvent::ctrl("Delete")));
        assert_eq!(editor.document().len(), 2);
        assert_eq!(editor.last_selected(), Some(0));

        assert!(editor.handle_key(&KeyEvent::ctrl("z")));
        assert_eq!(editor.document().len(), 3);
        assert_eq!(editor.history().entry_names(), vec!["placeTop", "delete"]);
    }

    #[test]
    fn test_menu_drop_is_undoable() {
        let mut editor = Editor::default();
        editor.menu_drag_start("button");
        assert_eq!(editor.drag_enter(), DropEffect::Move);
        assert!(editor.drag_over());
        assert!(editor.drop_component(Point::new(200.0, 100.0)));
        editor.menu_drag_end();

        assert_eq!(editor.document().len(), 1);
        assert_eq!(editor.history().entry_names(), vec!["drag"]);

        // Layout feedback centres the block without a new entry.
        assert!(editor.block_measured(0, 80.0, 20.0));
        let placed = editor.document().blocks[0].clone();
        assert_eq!((placed.left, placed.top), (160.0, 90.0));
        assert!(!placed.align_center);
        assert_eq!(editor.history().len(), 1);
        assert!(!editor.block_measured(0, 80.0, 20.0));

        assert!(editor.undo());
        assert!(editor.document().is_empty());
    }

    #[test]
    fn test_cancelled_menu_drag_records_nothing() {
        let mut editor = Editor::default();
        editor.menu_drag_start("text");
        editor.drag_enter();
        editor.drag_leave();
        editor.menu_drag_end();
        assert!(editor.history().is_empty());
        assert!(!editor.drag_over());
    }

    #[test]
    fn test_import_rejects_malformed_input() {
        let mut editor = editor();
        let before = editor.document();
        let err = editor.import_document(r#"{"container": {"width": 1}}"#).unwrap_err();
        assert!(matches!(err, EditorError::MalformedImport(_)));
        assert_eq!(editor.document(), before);
        assert!(editor.history().is_empty());
    }

    #[test]
    fn test_import_export_round_trip() {
        let mut editor = editor();
        let json = editor.export_document().unwrap();
        let mut other = Editor::default();
        other.import_document(&json).unwrap();
        assert_eq!(other.document(), editor.document());
        assert_eq!(other.history().entry_names(), vec!["updateContainer"]);

        let block_json = editor.export_block(2).unwrap().unwrap();
        assert!(editor.import_block(0, &block_json).unwrap());
        assert_eq!(editor.document().blocks[0], editor.document().blocks[2]);
        assert_eq!(editor.export_block(9).unwrap(), None);
    }

    #[test]
    fn test_dispose_detaches_drag_recording() {
        let mut editor = editor();
        editor.dispose();
        assert_eq!(editor.bus().listener_count(DragSignal::Start), 0);
        assert!(!editor.handle_key(&KeyEvent::ctrl("z")));
    }
}

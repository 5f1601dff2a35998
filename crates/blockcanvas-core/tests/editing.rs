//! Integration tests: editing through the public `Editor` API.
//!
//! Covers the history laws, z-order invariants, snapping, multi-drag,
//! commands issued mid-gesture, delete/undo ordering, shortcut clashes and
//! import rejection.

use blockcanvas_core::{
    Block, Chord, Command, CommandArgs, Container, Document, Editor, EditorConfig, EditorError, EditorResult,
    KeyEvent, Modifiers, Transition,
};
use kurbo::Point;
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn load_fixture() -> Editor {
    let document = Document::from_json(include_str!("fixtures/form.json")).unwrap();
    Editor::with_document(document, EditorConfig::default())
}

fn snapshot(editor: &Editor) -> Document {
    Document::clone(&editor.document())
}

// ─── History laws ───────────────────────────────────────────────────────

#[test]
fn invoke_then_undo_restores_document() {
    let mut editor = load_fixture();
    editor.select(1, false);
    let before = snapshot(&editor);

    assert!(editor.place_top());
    assert!(editor.undo());
    assert_eq!(snapshot(&editor), before);

    assert!(editor.delete_focused());
    assert!(editor.undo());
    assert_eq!(snapshot(&editor), before);

    assert!(editor.resize_container(Container::new(320.0, 480.0)));
    assert!(editor.undo());
    assert_eq!(snapshot(&editor), before);
}

#[test]
fn undo_then_redo_restores_document() {
    let mut editor = load_fixture();
    editor.select(0, false);
    editor.place_bottom();
    editor.delete_focused();
    let after = snapshot(&editor);

    assert!(editor.undo());
    assert!(editor.redo());
    assert_eq!(snapshot(&editor), after);
}

#[test]
fn new_command_prunes_redo_branch() {
    let mut editor = load_fixture();
    for width in [100.0, 200.0, 300.0] {
        editor.resize_container(Container::new(width, 100.0));
    }
    assert_eq!(editor.history().current_index(), Some(2));

    editor.undo();
    editor.undo();
    assert_eq!(editor.history().current_index(), Some(0));

    editor.resize_container(Container::new(999.0, 100.0));
    assert_eq!(editor.history().len(), 2);
    assert_eq!(editor.history().current_index(), Some(1));
    assert!(!editor.history().can_redo());
    assert!(!editor.redo());
    assert_eq!(editor.document().container.width, 999.0);

    editor.undo();
    assert_eq!(editor.document().container.width, 100.0);
}

#[test]
fn exhausted_history_is_silent() {
    let mut editor = load_fixture();
    let before = editor.document();
    assert!(!editor.undo());
    assert!(!editor.redo());
    assert!(Rc::ptr_eq(&before, &editor.document()));
}

// ─── Z-order ────────────────────────────────────────────────────────────

#[test]
fn place_top_ranks_above_unfocused() {
    let mut editor = load_fixture();
    editor.select(0, false);
    editor.select(3, true);
    assert!(editor.place_top());

    let document = editor.document();
    let top = document.blocks[0].z_index;
    assert_eq!(top, 3);
    assert_eq!(document.blocks[3].z_index, top);
    assert!(document.blocks.iter().filter(|b| !b.focus).all(|b| b.z_index < top));
}

#[test]
fn place_bottom_never_goes_negative() {
    let document = Document::default().with_blocks(vec![
        Block::new("text", 0.0, 0.0).with_z_index(0),
        Block::new("text", 50.0, 0.0).with_z_index(0),
        Block::new("text", 100.0, 0.0).with_z_index(3),
    ]);
    let mut editor = Editor::with_document(document, EditorConfig::default());
    editor.select(2, false);
    assert!(editor.place_bottom());

    let z: Vec<i64> = editor.document().blocks.iter().map(|b| b.z_index).collect();
    assert_eq!(z, vec![1, 1, 0]);
}

#[test]
fn z_order_without_focus_is_noop() {
    let mut editor = load_fixture();
    assert!(!editor.place_top());
    assert!(!editor.place_bottom());
    assert!(!editor.delete_focused());
    assert!(editor.history().is_empty());
}

#[test]
fn place_top_at_max_z_index_is_noop() {
    let document = Document::default().with_blocks(vec![
        Block::new("text", 0.0, 0.0).with_z_index(i64::MAX),
        Block::new("text", 50.0, 0.0).with_z_index(0),
    ]);
    let mut editor = Editor::with_document(document, EditorConfig::default());
    editor.select(1, false);
    let before = snapshot(&editor);

    assert!(!editor.place_top());
    assert_eq!(snapshot(&editor), before);
    assert!(editor.history().is_empty());
}

#[test]
fn place_bottom_at_min_z_index_is_noop() {
    let document = Document::default().with_blocks(vec![
        Block::new("text", 0.0, 0.0).with_z_index(i64::MIN),
        Block::new("text", 50.0, 0.0).with_z_index(0),
    ]);
    let mut editor = Editor::with_document(document, EditorConfig::default());
    editor.select(1, false);
    let before = snapshot(&editor);

    assert!(!editor.place_bottom());
    assert_eq!(snapshot(&editor), before);
    assert!(editor.history().is_empty());

    // Lifting the others past i64::MAX is refused the same way.
    let document = Document::default().with_blocks(vec![
        Block::new("text", 0.0, 0.0).with_z_index(-1),
        Block::new("text", 50.0, 0.0).with_z_index(i64::MAX),
        Block::new("text", 100.0, 0.0).with_z_index(0),
    ]);
    let mut editor = Editor::with_document(document, EditorConfig::default());
    editor.select(2, false);
    assert!(!editor.place_bottom());
    let z: Vec<i64> = editor.document().blocks.iter().map(|b| b.z_index).collect();
    assert_eq!(z, vec![-1, i64::MAX, 0]);
}

// ─── Drag and snap ──────────────────────────────────────────────────────

#[test]
fn drag_snaps_to_neighbour_top() {
    let document = Document::default().with_blocks(vec![
        Block::new("text", 100.0, 100.0).with_size(50.0, 50.0),
        Block::new("text", 200.0, 300.0).with_size(50.0, 50.0),
    ]);
    let mut editor = Editor::with_document(document, EditorConfig::default());
    assert!(editor.pointer_down_on_block(1, Point::new(300.0, 200.0), Modifiers::NONE));

    let update = editor.pointer_move(Point::new(300.0, 104.0)).unwrap();
    assert_eq!(update.guides.y, Some(100.0));
    assert_eq!(update.guides.x, None);
    editor.pointer_up(Point::new(300.0, 104.0));

    let moved = &editor.document().blocks[1];
    assert_eq!((moved.left, moved.top), (300.0, 100.0));
}

#[test]
fn multi_drag_keeps_relative_offsets() {
    let mut editor = load_fixture();
    editor.select(1, false);
    editor.select(2, true);
    editor.pointer_down_on_block(1, Point::new(60.0, 110.0), Modifiers::NONE);
    editor.pointer_move(Point::new(60.0, 117.0));
    editor.pointer_move(Point::new(60.0, 130.0));
    editor.pointer_up(Point::new(60.0, 130.0));

    let tops: Vec<f64> = editor.document().blocks.iter().map(|b| b.top).collect();
    assert_eq!(tops, vec![40.0, 120.0, 160.0, 200.0]);
    assert_eq!(editor.history().entry_names(), vec!["drag"]);
}

#[test]
fn delete_mid_drag_settles_gesture_first() {
    let mut editor = load_fixture();
    editor.select(1, false);
    editor.select(2, true);
    editor.pointer_down_on_block(1, Point::new(60.0, 110.0), Modifiers::NONE);
    editor.pointer_move(Point::new(60.0, 117.0));
    editor.pointer_move(Point::new(60.0, 130.0));

    assert!(editor.delete_focused());
    assert!(!editor.is_dragging());
    assert!(editor.pointer_move(Point::new(60.0, 300.0)).is_none());
    assert!(!editor.pointer_up(Point::new(60.0, 300.0)));

    let document = editor.document();
    let placed: Vec<(&str, f64)> = document.blocks.iter().map(|b| (b.key.as_str(), b.top)).collect();
    assert_eq!(placed, vec![("text", 40.0), ("button", 200.0)]);
    assert_eq!(editor.history().entry_names(), vec!["drag", "delete"]);

    assert!(editor.undo());
    let tops: Vec<f64> = editor.document().blocks.iter().map(|b| b.top).collect();
    assert_eq!(tops, vec![40.0, 120.0, 160.0, 200.0]);
}

#[test]
fn undo_mid_drag_reverts_the_gesture() {
    let mut editor = load_fixture();
    editor.select(1, false);
    editor.pointer_down_on_block(1, Point::new(60.0, 110.0), Modifiers::NONE);
    editor.pointer_move(Point::new(60.0, 117.0));
    editor.pointer_move(Point::new(60.0, 130.0));
    assert_eq!(editor.document().blocks[1].top, 120.0);

    assert!(editor.undo());
    assert!(!editor.is_dragging());
    assert!(editor.pointer_move(Point::new(60.0, 300.0)).is_none());
    assert_eq!(editor.document().blocks[1].top, 100.0);
    assert_eq!(editor.history().entry_names(), vec!["drag"]);
    assert_eq!(editor.history().current_index(), None);

    assert!(editor.redo());
    assert_eq!(editor.document().blocks[1].top, 120.0);
}

// ─── Delete ─────────────────────────────────────────────────────────────

#[test]
fn delete_then_undo_restores_positions() {
    let mut editor = load_fixture();
    editor.select(1, false);
    editor.select(2, true);
    let before = snapshot(&editor);

    assert!(editor.delete_focused());
    let document = editor.document();
    let keys: Vec<&str> = document.blocks.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["text", "button"]);

    assert!(editor.undo());
    assert_eq!(snapshot(&editor), before);
}

// ─── Shortcuts ──────────────────────────────────────────────────────────

struct Stamp;

impl Command for Stamp {
    fn name(&self) -> &str {
        "stamp"
    }

    fn shortcut(&self) -> Option<Chord> {
        Some(Chord::parse("Control+Z"))
    }

    fn execute(&mut self, _: CommandArgs, document: &Rc<Document>) -> EditorResult<Option<Transition>> {
        let blocks = vec![Block::new("stamp", 0.0, 0.0)];
        Ok(Some(Transition::new(Rc::clone(document), document.with_blocks(blocks))))
    }
}

#[test]
fn clashing_shortcut_is_rejected() {
    let mut editor = load_fixture();
    let bound = editor.history().keymap().shortcuts().len();

    let err = editor.history_mut().register(Box::new(Stamp)).unwrap_err();
    assert_eq!(err, EditorError::DuplicateShortcut("ctrl+z".into()));
    assert!(!editor.history().is_registered("stamp"));
    assert_eq!(editor.history().keymap().shortcuts().len(), bound);

    let before = snapshot(&editor);
    assert!(editor.resize_container(Container::new(320.0, 480.0)));
    assert!(editor.handle_key(&KeyEvent::ctrl("z")));
    assert_eq!(snapshot(&editor), before);
    assert_eq!(editor.history().entry_names(), vec!["updateContainer"]);
}

// ─── Import ─────────────────────────────────────────────────────────────

#[test]
fn invalid_import_leaves_state_unchanged() {
    let mut editor = load_fixture();
    editor.resize_container(Container::new(640.0, 480.0));
    let before = snapshot(&editor);

    for json in ["not json", r#"{"blocks": []}"#, r#"{"container": {"width": 1, "height": 1}, "blocks": [{"key": "text"}]}"#] {
        let err = editor.import_document(json).unwrap_err();
        assert!(matches!(err, EditorError::MalformedImport(_)), "{json}");
    }

    assert_eq!(snapshot(&editor), before);
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.history().current_index(), Some(0));
}

#[test]
fn import_is_undoable() {
    let mut editor = Editor::default();
    editor.import_document(include_str!("fixtures/form.json")).unwrap();
    assert_eq!(editor.document().len(), 4);
    editor.undo();
    assert!(editor.document().is_empty());
}

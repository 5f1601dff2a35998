//! BlockCanvas Core Library
//!
//! Platform-agnostic editing engine for the BlockCanvas drag-and-drop
//! editor: document model, selection, undoable command history, drag with
//! alignment snapping and menu drop placement.

pub mod bus;
pub mod config;
pub mod document;
pub mod drag;
pub mod editor;
pub mod error;
pub mod history;
pub mod input;
pub mod panel;
pub mod placement;
pub mod registry;
pub mod selection;
pub mod shortcuts;
pub mod snap;

pub use bus::{DragSignal, EventBus, ListenerId};
pub use config::EditorConfig;
pub use document::{Block, Container, Document, DocumentModel, ObserverId};
pub use drag::{DragSession, DragUpdate};
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
pub use history::{Command, CommandArgs, CommandHistory, CommandName, Transition};
pub use input::{KeyEvent, Modifiers, PointerEvent};
pub use panel::{EditTarget, FieldKind, PanelField, PropertyPanel};
pub use placement::{DropEffect, MenuDrag};
pub use registry::{Component, ComponentRegistry, ComponentView, FormData, PropKind, RenderContext};
pub use selection::{FocusSplit, Selection};
pub use shortcuts::{Chord, Keymap, Shortcut};
pub use snap::{GuideLine, GuideLines, Guides, SNAP_TOLERANCE, snap_position};

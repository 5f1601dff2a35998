//! Dropping components from the menu onto the canvas.

use crate::document::{Block, Document};
use kurbo::Point;

/// Cursor affordance shown while a component hovers the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropEffect {
    #[default]
    None,
    Move,
}

/// Append a freshly dropped block at `position` (canvas-relative).
///
/// The block is flagged for recentring once its rendered size is known.
pub fn place_block(document: &Document, key: &str, position: Point, z_index: i64) -> Document {
    let mut block = Block::new(key, position.y, position.x).with_z_index(z_index);
    block.align_center = true;
    let mut blocks = document.blocks.clone();
    blocks.push(block);
    document.with_blocks(blocks)
}

/// Drop-target state for one drag from the component menu.
///
/// The canvas handlers are live only between [`MenuDrag::start`] and
/// [`MenuDrag::end`]; outside that window every handler is inert.
#[derive(Debug, Clone, Default)]
pub struct MenuDrag {
    component: Option<String>,
    effect: DropEffect,
    started: bool,
}

impl MenuDrag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dragging the component with `key` out of the menu.
    pub fn start(&mut self, key: impl Into<String>) {
        self.component = Some(key.into());
        self.effect = DropEffect::None;
        self.started = true;
    }

    pub fn is_active(&self) -> bool {
        self.component.is_some()
    }

    /// Pointer entered the canvas.
    pub fn drag_enter(&mut self) -> DropEffect {
        if self.is_active() {
            self.effect = DropEffect::Move;
        }
        self.effect
    }

    /// Pointer is over the canvas. Returns whether the platform default must
    /// be prevented, which is what allows the drop to fire.
    pub fn drag_over(&self) -> bool {
        self.is_active()
    }

    /// Pointer left the canvas.
    pub fn drag_leave(&mut self) -> DropEffect {
        self.effect = DropEffect::None;
        self.effect
    }

    /// Released over the canvas. Returns the document with the new block.
    pub fn drop(&mut self, document: &Document, position: Point, z_index: i64) -> Option<Document> {
        let key = self.component.take()?;
        self.effect = DropEffect::None;
        Some(place_block(document, &key, position, z_index))
    }

    /// The menu drag finished, dropped or not. Returns whether one had been
    /// started.
    pub fn end(&mut self) -> bool {
        self.effect = DropEffect::None;
        self.component = None;
        std::mem::take(&mut self.started)
    }
}

//! Pointer-driven multi-block drag with alignment snapping.

use crate::document::Document;
use crate::selection::FocusSplit;
use crate::snap::{GuideLines, Guides, snap_position};
use kurbo::{Point, Size, Vec2};

/// Outcome of a single pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    /// True on the first move of the gesture.
    pub started: bool,
    /// Post-snap offset applied to every focused block.
    pub delta: Vec2,
    pub guides: Guides,
}

/// State captured at pointer-down for one drag gesture.
///
/// Exists only between pointer-down and pointer-up; dropping it is how the
/// gesture's move/up handling is detached.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Cursor position at pointer-down.
    start_cursor: Point,
    /// Anchor block's `left`/`top` at pointer-down.
    anchor_start: Point,
    /// Starting `left`/`top` of every focused block, by sequence index.
    starts: Vec<(usize, Point)>,
    lines: GuideLines,
    tolerance: f64,
    dragging: bool,
    guides: Guides,
}

impl DragSession {
    /// Capture a gesture anchored on the block at `anchor`.
    ///
    /// Returns `None` unless the anchor exists and is focused; selection has
    /// to happen before a drag can start.
    pub fn begin(document: &Document, anchor: usize, cursor: Point, tolerance: f64) -> Option<Self> {
        let anchor_block = document.block(anchor).filter(|b| b.focus)?;
        let split = FocusSplit::of(document);

        let starts = split
            .focused
            .iter()
            .map(|(index, block)| (*index, block.origin()))
            .collect();

        let candidates = split
            .unfocused_blocks()
            .map(|block| block.bounds())
            .chain(std::iter::once(document.container.bounds()));
        let lines = GuideLines::build(Size::new(anchor_block.width, anchor_block.height), candidates);

        Some(Self {
            start_cursor: cursor,
            anchor_start: anchor_block.origin(),
            starts,
            lines,
            tolerance,
            dragging: false,
            guides: Guides::default(),
        })
    }

    /// Whether any move has happened in this gesture.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Guides to draw for the latest move.
    pub fn guides(&self) -> Guides {
        self.guides
    }

    pub fn lines(&self) -> &GuideLines {
        &self.lines
    }

    /// Indices of the blocks moved by this gesture.
    pub fn moving(&self) -> impl Iterator<Item = usize> + '_ {
        self.starts.iter().map(|(i, _)| *i)
    }

    /// Process one pointer move.
    pub fn pointer_move(&mut self, cursor: Point) -> DragUpdate {
        let started = !self.dragging;
        self.dragging = true;

        let prospective = self.anchor_start + (cursor - self.start_cursor);
        let snapped = snap_position(&self.lines, prospective, self.tolerance);
        if snapped.is_snapped() {
            log::trace!("snapped to guides {:?}", snapped.guides);
        }
        self.guides = snapped.guides;

        DragUpdate {
            started,
            delta: snapped.point - self.anchor_start,
            guides: snapped.guides,
        }
    }

    /// Move every focused block by `delta` from its starting position.
    ///
    /// Focus is re-read from `document`: a recorded index that no longer
    /// holds a focused block is left alone.
    pub fn apply(&self, document: &Document, delta: Vec2) -> Document {
        let mut blocks = document.blocks.clone();
        for (index, start) in &self.starts {
            let Some(block) = blocks.get_mut(*index).filter(|b| b.focus) else {
                continue;
            };
            block.left = start.x + delta.x;
            block.top = start.y + delta.y;
        }
        document.with_blocks(blocks)
    }

    /// End the gesture. Returns whether the pointer moved at all.
    pub fn finish(self) -> bool {
        self.dragging
    }
}

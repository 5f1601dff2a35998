//! Focus (selection) model.
//!
//! Focus lives on the blocks themselves, so every selection change yields a
//! new document. The focused/unfocused split is always derived from the
//! document passed in and never cached.

use crate::document::{Block, Document};

/// Blocks partitioned by focus, each paired with its sequence index.
#[derive(Debug, Clone, Default)]
pub struct FocusSplit<'a> {
    pub focused: Vec<(usize, &'a Block)>,
    pub unfocused: Vec<(usize, &'a Block)>,
}

impl<'a> FocusSplit<'a> {
    pub fn of(document: &'a Document) -> Self {
        let mut split = Self::default();
        for (index, block) in document.blocks.iter().enumerate() {
            if block.focus {
                split.focused.push((index, block));
            } else {
                split.unfocused.push((index, block));
            }
        }
        split
    }

    pub fn has_focus(&self) -> bool {
        !self.focused.is_empty()
    }

    pub fn focused_indices(&self) -> Vec<usize> {
        self.focused.iter().map(|(i, _)| *i).collect()
    }

    pub fn unfocused_blocks(&self) -> impl Iterator<Item = &'a Block> + '_ {
        self.unfocused.iter().map(|(_, b)| *b)
    }
}

/// Selection state that is not stored on the blocks.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Index of the block clicked last; anchors drags and the property panel.
    last_selected: Option<usize>,
    /// Read-only rendering mode. All selection calls are no-ops while set.
    preview: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_selected(&self) -> Option<usize> {
        self.last_selected
    }

    /// The last selected block, if it still exists.
    pub fn last_selected_block<'a>(&self, document: &'a Document) -> Option<&'a Block> {
        self.last_selected.and_then(|i| document.block(i))
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn set_preview(&mut self, preview: bool) {
        self.preview = preview;
    }

    /// Click selection. Returns the document with updated focus flags, or
    /// `None` when nothing changes hands (preview mode, stale index).
    ///
    /// With `additive` (shift) a block is toggled, except that the only
    /// focused block cannot be toggled off. Without it, clicking an already
    /// focused block keeps the current multi-selection so it can be dragged.
    pub fn select(&mut self, document: &Document, index: usize, additive: bool) -> Option<Document> {
        if self.preview || index >= document.len() {
            return None;
        }
        let focused_count = document.blocks.iter().filter(|b| b.focus).count();
        let mut blocks = document.blocks.clone();

        if additive {
            if focused_count <= 1 {
                blocks[index].focus = true;
            } else {
                blocks[index].focus = !blocks[index].focus;
            }
        } else if !blocks[index].focus {
            for block in &mut blocks {
                block.focus = false;
            }
            blocks[index].focus = true;
        }

        self.last_selected = Some(index);
        Some(document.with_blocks(blocks))
    }

    /// Unfocus every block. Returns `None` in preview mode.
    pub fn clear_focus(&mut self, document: &Document) -> Option<Document> {
        if self.preview {
            return None;
        }
        Some(self.unfocus_all(document))
    }

    /// Unfocus every block regardless of mode (used when toggling preview).
    pub(crate) fn unfocus_all(&mut self, document: &Document) -> Document {
        self.last_selected = None;
        let blocks = document
            .blocks
            .iter()
            .map(|block| Block {
                focus: false,
                ..block.clone()
            })
            .collect();
        document.with_blocks(blocks)
    }

    /// Drop the anchor if it no longer points into the document.
    pub fn revalidate(&mut self, document: &Document) {
        if self.last_selected.is_some_and(|i| i >= document.len()) {
            self.last_selected = None;
        }
    }
}

//! Property panel edit buffer.
//!
//! The panel edits a copy of either the container or the selected block.
//! Nothing reaches the document until [`PropertyPanel::apply`], which goes
//! through the regular undoable commands.

use crate::document::{Block, Container};
use crate::editor::Editor;
use crate::registry::{ComponentRegistry, PropKind};
use serde_json::Value;

/// What the panel is currently editing.
#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    Container(Container),
    Block { index: usize, block: Block },
}

/// Widget to show for a panel field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Container dimension.
    Number,
    Prop(PropKind),
    /// Form field name for a two-way binding slot.
    Binding,
}

/// One editable row of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct PropertyPanel {
    target: EditTarget,
    dirty: bool,
}

impl PropertyPanel {
    /// Load the panel from the editor's current state.
    pub fn new(editor: &Editor) -> Self {
        let mut panel = Self {
            target: EditTarget::Container(editor.document().container),
            dirty: false,
        };
        panel.reset(editor);
        panel
    }

    pub fn target(&self) -> &EditTarget {
        &self.target
    }

    /// Whether the buffer holds edits not yet applied.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Discard edits and re-read the target. The last selected block is
    /// edited while it is focused, the container otherwise.
    pub fn reset(&mut self, editor: &Editor) {
        let selected = editor
            .last_selected()
            .zip(editor.last_selected_block())
            .filter(|(_, block)| block.focus);
        self.target = match selected {
            Some((index, block)) => EditTarget::Block { index, block },
            None => EditTarget::Container(editor.document().container),
        };
        self.dirty = false;
    }

    /// Set a block prop. Returns false when editing the container.
    pub fn set_prop(&mut self, name: impl Into<String>, value: Value) -> bool {
        let EditTarget::Block { block, .. } = &mut self.target else {
            return false;
        };
        block.props.insert(name.into(), value);
        self.dirty = true;
        true
    }

    /// Bind `slot` to the form field `field`. An empty field name unbinds.
    pub fn set_binding(&mut self, slot: impl Into<String>, field: impl Into<String>) -> bool {
        let EditTarget::Block { block, .. } = &mut self.target else {
            return false;
        };
        let (slot, field) = (slot.into(), field.into());
        if field.is_empty() {
            block.model.remove(&slot);
        } else {
            block.model.insert(slot, field);
        }
        self.dirty = true;
        true
    }

    /// Returns false when editing a block.
    pub fn set_container_size(&mut self, width: f64, height: f64) -> bool {
        let EditTarget::Container(container) = &mut self.target else {
            return false;
        };
        *container = Container::new(width, height);
        self.dirty = true;
        true
    }

    /// Rows to display, from the component schema for blocks.
    pub fn fields(&self, registry: &ComponentRegistry) -> Vec<PanelField> {
        match &self.target {
            EditTarget::Container(container) => vec![
                PanelField {
                    name: "width".into(),
                    label: "Width".into(),
                    kind: FieldKind::Number,
                    value: Value::from(container.width),
                },
                PanelField {
                    name: "height".into(),
                    label: "Height".into(),
                    kind: FieldKind::Number,
                    value: Value::from(container.height),
                },
            ],
            EditTarget::Block { block, .. } => {
                let Some(component) = registry.get(&block.key) else {
                    log::warn!("no schema for block key '{}'", block.key);
                    return Vec::new();
                };
                let props = component.props.iter().map(|prop| PanelField {
                    name: prop.name.clone(),
                    label: prop.label.clone(),
                    kind: FieldKind::Prop(prop.kind.clone()),
                    value: block.props.get(&prop.name).cloned().unwrap_or(Value::Null),
                });
                let slots = component.model.iter().map(|slot| PanelField {
                    name: slot.name.clone(),
                    label: slot.label.clone(),
                    kind: FieldKind::Binding,
                    value: block
                        .model
                        .get(&slot.name)
                        .map_or(Value::Null, |field| Value::from(field.as_str())),
                });
                props.chain(slots).collect()
            }
        }
    }

    /// Commit the buffer as one history entry. Returns whether anything
    /// was committed.
    pub fn apply(&mut self, editor: &mut Editor) -> bool {
        if !self.dirty {
            return false;
        }
        let applied = match &self.target {
            EditTarget::Container(container) => editor.resize_container(*container),
            EditTarget::Block { index, block } => editor.update_block(*index, block.clone()),
        };
        self.dirty = false;
        applied
    }
}

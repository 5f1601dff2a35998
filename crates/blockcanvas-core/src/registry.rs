//! Component registry: maps a block's `key` to its view and property schema.
//!
//! The engine only ever asks a component for its preview or for a render
//! bound to a block's props and form bindings; what a view produces is
//! opaque here.

use crate::document::Block;
use crate::error::{EditorError, EditorResult};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

/// Form values addressed by field name, shared by all two-way bindings.
pub type FormData = BTreeMap<String, Value>;

/// One choice of a select property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Editor widget used for a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropKind {
    Input,
    Color,
    Select(Vec<SelectOption>),
}

/// A property the panel can edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropField {
    pub name: String,
    pub label: String,
    pub kind: PropKind,
}

/// A two-way binding slot; the block maps it to a form field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSlot {
    pub name: String,
    pub label: String,
}

/// Resolved binding for one slot at render time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding<'a> {
    /// Form field bound to the slot, if the block binds it.
    pub field: Option<&'a str>,
    /// Current value of that field.
    pub value: Option<&'a Value>,
}

/// Everything a view may read when rendering a block.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub props: &'a BTreeMap<String, Value>,
    bindings: BTreeMap<&'a str, Binding<'a>>,
}

impl<'a> RenderContext<'a> {
    /// Resolve `component`'s slots against `block` and `form`.
    pub fn new(component: &'a Component, block: &'a Block, form: &'a FormData) -> Self {
        let bindings = component
            .model
            .iter()
            .map(|slot| {
                let field = block.model.get(&slot.name).map(String::as_str);
                let value = field.and_then(|f| form.get(f));
                (slot.name.as_str(), Binding { field, value })
            })
            .collect();
        Self {
            props: &block.props,
            bindings,
        }
    }

    pub fn prop(&self, name: &str) -> Option<&'a Value> {
        self.props.get(name)
    }

    /// String prop, or `None` if absent or not a string.
    pub fn prop_str(&self, name: &str) -> Option<&'a str> {
        self.prop(name).and_then(Value::as_str)
    }

    pub fn binding(&self, slot: &str) -> Option<Binding<'a>> {
        self.bindings.get(slot).copied()
    }
}

/// Rendering half of a component.
pub trait ComponentView {
    /// Lightweight representation shown in the component menu.
    fn preview(&self) -> String;

    /// Representation of a placed block.
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

/// A registered block type.
#[derive(Clone)]
pub struct Component {
    pub key: String,
    pub label: String,
    pub props: Vec<PropField>,
    pub model: Vec<ModelSlot>,
    view: Rc<dyn ComponentView>,
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("props", &self.props)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Component {
    pub fn new(key: impl Into<String>, label: impl Into<String>, view: impl ComponentView + 'static) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            props: Vec::new(),
            model: Vec::new(),
            view: Rc::new(view),
        }
    }

    /// Add an editable property.
    pub fn prop(mut self, name: impl Into<String>, label: impl Into<String>, kind: PropKind) -> Self {
        self.props.push(PropField {
            name: name.into(),
            label: label.into(),
            kind,
        });
        self
    }

    /// Add a two-way binding slot.
    pub fn slot(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.model.push(ModelSlot {
            name: name.into(),
            label: label.into(),
        });
        self
    }

    pub fn preview(&self) -> String {
        self.view.preview()
    }

    pub fn render(&self, block: &Block, form: &FormData) -> String {
        self.view.render(&RenderContext::new(self, block, form))
    }
}

/// Components in registration order, indexed by key.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: Vec<Component>,
    by_key: HashMap<String, usize>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component. Keys must be unique.
    pub fn register(&mut self, component: Component) -> EditorResult<()> {
        if self.by_key.contains_key(&component.key) {
            return Err(EditorError::DuplicateComponent(component.key));
        }
        self.by_key.insert(component.key.clone(), self.components.len());
        self.components.push(component);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Component> {
        self.by_key.get(key).map(|&i| &self.components[i])
    }

    /// Components in menu order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Render a block, or `None` if its key has no registered component.
    pub fn render(&self, block: &Block, form: &FormData) -> Option<String> {
        match self.get(&block.key) {
            Some(component) => Some(component.render(block, form)),
            None => {
                log::warn!("no component registered for key '{}'", block.key);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Label;

    impl ComponentView for Label {
        fn preview(&self) -> String {
            "label".into()
        }

        fn render(&self, ctx: &RenderContext<'_>) -> String {
            let text = ctx.prop_str("text").unwrap_or("-");
            let bound = ctx
                .binding("value")
                .and_then(|b| b.value)
                .map(|v| v.to_string())
                .unwrap_or_default();
            format!("{text}:{bound}")
        }
    }

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        registry
            .register(
                Component::new("label", "Label", Label)
                    .prop("text", "Text", PropKind::Input)
                    .slot("value", "Bound field"),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut registry = registry();
        let err = registry.register(Component::new("label", "Again", Label)).unwrap_err();
        assert_eq!(err, EditorError::DuplicateComponent("label".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_render_with_props_and_binding() {
        let registry = registry();
        let mut block = Block::new("label", 0.0, 0.0);
        block.props.insert("text".into(), json!("Name"));
        block.model.insert("value".into(), "username".into());
        let mut form = FormData::new();
        form.insert("username".into(), json!("ada"));

        assert_eq!(registry.render(&block, &form).unwrap(), "Name:\"ada\"");
    }

    #[test]
    fn test_missing_component_renders_nothing() {
        let registry = registry();
        assert!(registry.render(&Block::new("ghost", 0.0, 0.0), &FormData::new()).is_none());
    }

    #[test]
    fn test_unbound_slot() {
        let registry = registry();
        let component = registry.get("label").unwrap();
        let block = Block::new("label", 0.0, 0.0);
        let form = FormData::new();
        let ctx = RenderContext::new(component, &block, &form);
        let binding = ctx.binding("value").unwrap();
        assert!(binding.field.is_none() && binding.value.is_none());
    }
}

//! Built-in component set: text, button, input and range.
//!
//! Views render to a compact bracketed text form suitable for terminal
//! outlines.

use blockcanvas_core::registry::{Binding, SelectOption};
use blockcanvas_core::{Block, Component, ComponentRegistry, ComponentView, EditorResult, PropKind, RenderContext};

/// Approximate glyph advance used for text measurement.
const CHAR_WIDTH: f64 = 8.0;
const LINE_HEIGHT: f64 = 20.0;
const FIELD_SIZE: (f64, f64) = (200.0, 32.0);

fn bound_value(binding: Option<Binding<'_>>) -> String {
    match binding.and_then(|b| b.value) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

struct Text;

impl ComponentView for Text {
    fn preview(&self) -> String {
        "Preview text".into()
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let text = ctx.prop_str("text").unwrap_or("Rendered text");
        let mut styles = Vec::new();
        if let Some(color) = ctx.prop_str("color") {
            styles.push(format!("color={color}"));
        }
        if let Some(size) = ctx.prop_str("size") {
            styles.push(format!("size={size}"));
        }
        if styles.is_empty() {
            text.to_string()
        } else {
            format!("{text} ({})", styles.join(", "))
        }
    }
}

struct Button;

impl ComponentView for Button {
    fn preview(&self) -> String {
        "[ Preview button ]".into()
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let text = ctx.prop_str("text").unwrap_or("Rendered text");
        match ctx.prop_str("type").filter(|t| !t.is_empty()) {
            Some(kind) => format!("[ {text} ]:{kind}"),
            None => format!("[ {text} ]"),
        }
    }
}

struct Input;

impl ComponentView for Input {
    fn preview(&self) -> String {
        "[______]".into()
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let value = bound_value(ctx.binding("default"));
        if value.is_empty() {
            "[_ Rendered input _]".into()
        } else {
            format!("[_ {value} _]")
        }
    }
}

struct Range;

impl ComponentView for Range {
    fn preview(&self) -> String {
        "[__ ~ __]".into()
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let start = bound_value(ctx.binding("start"));
        let end = bound_value(ctx.binding("end"));
        format!("[{start} ~ {end}]")
    }
}

fn select(options: &[(&str, &str)]) -> PropKind {
    PropKind::Select(options.iter().map(|(l, v)| SelectOption::new(*l, *v)).collect())
}

/// Registry holding the built-in components in menu order.
pub fn builtin_registry() -> EditorResult<ComponentRegistry> {
    let mut registry = ComponentRegistry::new();

    registry.register(
        Component::new("text", "Text", Text)
            .prop("text", "Text content", PropKind::Input)
            .prop("color", "Font color", PropKind::Color)
            .prop("size", "Font size", select(&[("14px", "14px"), ("20px", "20px"), ("24px", "24px")])),
    )?;

    registry.register(
        Component::new("button", "Button", Button)
            .prop("text", "Button label", PropKind::Input)
            .prop(
                "type",
                "Button type",
                select(&[
                    ("Basic", "primary"),
                    ("Success", "success"),
                    ("Warning", "warning"),
                    ("Danger", "danger"),
                    ("Text", "text"),
                ]),
            )
            .prop(
                "size",
                "Button size",
                select(&[("Default", ""), ("Medium", "medium"), ("Small", "small"), ("Mini", "mini")]),
            ),
    )?;

    registry.register(Component::new("input", "Input", Input).slot("default", "Bound field"))?;

    registry.register(
        Component::new("range", "Range", Range)
            .slot("start", "Range start")
            .slot("end", "Range end"),
    )?;

    Ok(registry)
}

/// Estimated rendered size of a block, standing in for browser layout.
pub fn measure(block: &Block, rendered: &str) -> (f64, f64) {
    let chars = rendered.chars().count() as f64;
    match block.key.as_str() {
        "input" | "range" => FIELD_SIZE,
        "button" => (chars * CHAR_WIDTH + 16.0, FIELD_SIZE.1),
        _ => (chars * CHAR_WIDTH, LINE_HEIGHT),
    }
}

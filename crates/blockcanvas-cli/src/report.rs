//! Layout and outline of a loaded document.

use crate::components::measure;
use blockcanvas_core::{ComponentRegistry, Editor, FormData};

/// Measure every block the way a renderer would after mounting, which also
/// settles blocks still waiting to be centred. Returns how many changed.
pub fn layout(editor: &mut Editor, registry: &ComponentRegistry, form: &FormData) -> usize {
    let mut changed = 0;
    for index in 0..editor.document().len() {
        let Some(rendered) = editor.render_block(index, registry, form) else {
            continue;
        };
        let Some(block) = editor.document().block(index).cloned() else {
            continue;
        };
        let (width, height) = measure(&block, &rendered);
        if editor.block_measured(index, width, height) {
            changed += 1;
        }
    }
    log::debug!("layout updated {} block(s)", changed);
    changed
}

/// Text outline of the canvas in paint order.
pub fn outline(editor: &Editor, registry: &ComponentRegistry, form: &FormData) -> String {
    let document = editor.document();
    let mut out = format!(
        "canvas {}x{} ({} block(s))\n",
        document.container.width,
        document.container.height,
        document.len()
    );
    for block in document.blocks_painted() {
        let rendered = registry
            .render(block, form)
            .unwrap_or_else(|| format!("<unknown component '{}'>", block.key));
        out.push_str(&format!(
            "  z={:<3} {:<8} @ ({}, {}) {}x{}  {}\n",
            block.z_index, block.key, block.left, block.top, block.width, block.height, rendered
        ));
    }
    out
}

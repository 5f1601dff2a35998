//! Keyboard shortcut listing.

use blockcanvas_core::Keymap;

/// Human description of a built-in command.
fn describe(command: &str) -> &str {
    match command {
        "undo" => "Undo",
        "redo" => "Redo",
        "delete" => "Delete focused blocks",
        "placeTop" => "Bring focused blocks to front",
        "placeBottom" => "Send focused blocks to back",
        other => other,
    }
}

/// One `(chord, description)` row per binding, in binding order.
pub fn rows(keymap: &Keymap) -> Vec<(String, String)> {
    keymap
        .shortcuts()
        .iter()
        .map(|s| (s.chord.format(), describe(&s.command).to_string()))
        .collect()
}

/// Print all shortcuts to console.
pub fn print_all(keymap: &Keymap) {
    println!("\n=== Keyboard Shortcuts ===");
    for (chord, description) in rows(keymap) {
        println!("  {:20} {}", chord, description);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockcanvas_core::Editor;

    #[test]
    fn test_default_rows() {
        let editor = Editor::default();
        let rows = rows(editor.history().keymap());
        assert_eq!(rows[0], ("Ctrl+Z".to_string(), "Undo".to_string()));
        assert_eq!(rows[1], ("Ctrl+Y".to_string(), "Redo".to_string()));
        assert!(rows.contains(&("Ctrl+Delete".to_string(), "Delete focused blocks".to_string())));
    }
}

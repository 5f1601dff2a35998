//! Keyboard chords and the command keymap.

use crate::error::{EditorError, EditorResult};
use crate::input::{KeyEvent, Modifiers};
use std::fmt;

/// A normalized key chord such as `ctrl+z`.
///
/// Modifiers come first in the fixed order ctrl, shift, alt, meta, then the
/// key, all lower case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord(String);

const MODIFIER_KEYS: [&str; 6] = ["control", "ctrl", "shift", "alt", "meta", "os"];

fn normalize_key(key: &str) -> String {
    let key = key.trim().to_ascii_lowercase();
    match key.as_str() {
        // Backspace shares the delete binding.
        "delete" | "del" | "backspace" => "delete".to_string(),
        "esc" => "escape".to_string(),
        _ => key,
    }
}

fn compose(modifiers: Modifiers, key: &str) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(5);
    if modifiers.ctrl {
        parts.push("ctrl");
    }
    if modifiers.shift {
        parts.push("shift");
    }
    if modifiers.alt {
        parts.push("alt");
    }
    if modifiers.meta {
        parts.push("meta");
    }
    parts.push(key);
    parts.join("+")
}

impl Chord {
    /// Parse a chord written in any case or modifier order.
    pub fn parse(text: &str) -> Self {
        let mut modifiers = Modifiers::default();
        let mut key = String::new();
        for part in text.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" => modifiers.alt = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                _ => key = normalize_key(part),
            }
        }
        Self(compose(modifiers, &key))
    }

    /// Chord for a key event, or `None` for a bare modifier press.
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        let key = normalize_key(&event.key);
        if key.is_empty() || MODIFIER_KEYS.contains(&key.as_str()) {
            return None;
        }
        Some(Self(compose(event.modifiers, &key)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format the chord for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        self.0
            .split('+')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chord bound to a command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub chord: Chord,
    pub command: String,
}

/// Chord to command lookup table, in binding order. Each chord maps to at
/// most one command.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<Shortcut>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, chord: &Chord) -> bool {
        self.bindings.iter().any(|s| s.chord == *chord)
    }

    /// Bind a chord. A chord that is already bound is rejected.
    pub fn bind(&mut self, chord: Chord, command: impl Into<String>) -> EditorResult<()> {
        if self.contains(&chord) {
            return Err(EditorError::DuplicateShortcut(chord.to_string()));
        }
        self.bindings.push(Shortcut {
            chord,
            command: command.into(),
        });
        Ok(())
    }

    /// Command bound to the event's chord.
    pub fn resolve(&self, event: &KeyEvent) -> Option<&str> {
        let chord = Chord::from_event(event)?;
        self.bindings
            .iter()
            .find(|s| s.chord == chord)
            .map(|s| s.command.as_str())
    }

    /// All bindings, for help listings.
    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.bindings
    }
}

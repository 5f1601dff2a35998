//! Editor configuration.

use crate::document::Container;
use crate::error::{EditorError, EditorResult};
use crate::snap::SNAP_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Tunables for one editor instance. Every field has a default, so a config
/// file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Snap capture distance in canvas pixels.
    pub snap_tolerance: f64,
    /// Maximum number of undo entries; unbounded when absent.
    pub history_limit: Option<usize>,
    /// Container used for a fresh document.
    pub default_container: Container,
    /// z-index given to blocks dropped from the menu.
    pub new_block_z_index: i64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: SNAP_TOLERANCE,
            history_limit: None,
            default_container: Container::default(),
            new_block_z_index: 1,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))?;
        if !(config.snap_tolerance >= 0.0) {
            return Err(EditorError::Config(format!(
                "snapTolerance must be non-negative, got {}",
                config.snap_tolerance
            )));
        }
        Ok(config)
    }
}

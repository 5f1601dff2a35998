//! Error types for the editing engine.

use thiserror::Error;

/// Editor errors.
///
/// Only genuinely exceptional conditions live here. Operations on an empty
/// selection or an exhausted history are no-ops, not errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditorError {
    #[error("Malformed import: {0}")]
    MalformedImport(String),
    #[error("Command already registered: {0}")]
    DuplicateCommand(String),
    #[error("Shortcut already bound: {0}")]
    DuplicateShortcut(String),
    #[error("Component already registered: {0}")]
    DuplicateComponent(String),
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Invalid arguments for command {0}")]
    InvalidArguments(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Serialization(err.to_string())
    }
}

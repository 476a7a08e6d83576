//! Error types for backdrop operations

use std::fmt;

/// Errors that can occur while parsing blocks, persisting settings or rendering previews
#[derive(Debug, Clone, PartialEq)]
pub enum BackdropError {
    /// Block has no usable image reference (carries the reference as authored)
    MissingPath(String),
    /// Settings could not be loaded or persisted
    Settings(String),
    /// Filesystem access failed
    Io(String),
    /// Render tree could not be built or serialized
    Render(String),
}

impl fmt::Display for BackdropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackdropError::MissingPath(reference) if reference.is_empty() => {
                write!(f, "Missing image path: add a 'path:' line to the block")
            }
            BackdropError::MissingPath(reference) => {
                write!(f, "Image not found: '{reference}'")
            }
            BackdropError::Settings(msg) => write!(f, "Settings error: {msg}"),
            BackdropError::Io(msg) => write!(f, "I/O error: {msg}"),
            BackdropError::Render(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for BackdropError {}

impl From<std::io::Error> for BackdropError {
    fn from(err: std::io::Error) -> Self {
        BackdropError::Io(err.to_string())
    }
}

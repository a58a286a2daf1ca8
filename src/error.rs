use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Input rejected before any drawing happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The input was not text (invalid UTF-8, or a non-string JSON value)
    #[error("Input must be a string.")]
    TypeMismatch { found: String },

    /// The input is longer than the configured cap
    #[error("Input exceeds the maximum length of {max} characters.")]
    LengthExceeded { length: usize, max: usize },
}

/// Errors that can occur while turning markdown into an image
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The drawing surface could not be created or parsed back
    #[error("Surface error: {0}")]
    Surface(String),

    /// The finished raster could not be encoded
    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    /// A font file could not be loaded or registered
    #[error("Failed to register font {}: {reason}", .path.display())]
    Font { path: PathBuf, reason: String },

    /// Theme file could not be read or parsed
    #[error("Invalid theme: {0}")]
    Config(String),
}

impl RenderError {
    /// True when the error was raised by input validation rather than rendering.
    pub fn is_validation(&self) -> bool {
        matches!(self, RenderError::Validation(_))
    }
}

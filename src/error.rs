//! Error types for trajectory-viewer

use thiserror::Error;

/// Message listing every trajectory shape the normalizer accepts
pub const ACCEPTED_SHAPES: &str = "Invalid trajectory format. Expected one of:\n\
1. Array of events with action, args, timestamp, etc.\n\
2. Object with \"entries\" array containing events\n\
3. Object with \"history\" array containing events\n\
4. Object with \"test_result.git_patch\" containing a git patch";

/// Main error type for the trajectory-viewer library
#[derive(Error, Debug)]
pub enum Error {
    /// Top-level payload matches none of the accepted trajectory shapes
    #[error("{0}")]
    Format(String),

    /// Trajectory text is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Format error carrying the list of accepted shapes
    pub fn unsupported_shape() -> Self {
        Error::Format(ACCEPTED_SHAPES.to_string())
    }
}

/// Result type alias for trajectory-viewer
pub type Result<T> = std::result::Result<T, Error>;

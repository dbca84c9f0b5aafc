//! Error types for html5-video
//!
//! Construction and configuration failures are reported through
//! `Html5VideoError`. Playback-time problems (bad transport input, native
//! media failures, rejected cast loads) never surface here; they are ignored,
//! reported through callbacks, or logged.

use crate::cast::CastError;
use thiserror::Error;

/// Main error type for html5-video
#[derive(Error, Debug)]
pub enum Html5VideoError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cast framework errors
    #[error("Cast error: {0}")]
    Cast(#[from] CastError),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Html5VideoError {
    /// Create a configuration error from string
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Html5VideoError::Config(msg.into())
    }
}

/// Convenience type alias for Results in html5-video
pub type Result<T> = std::result::Result<T, Html5VideoError>;

/// Extension trait for converting other errors to Html5VideoError
pub trait IntoVideoError<T> {
    /// Convert this error into a configuration error with the given context
    fn config_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoVideoError<T> for std::result::Result<T, E> {
    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| Html5VideoError::Config(format!("{}: {}", context, e)))
    }
}

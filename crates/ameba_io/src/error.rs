//! Error types for the ameba_io crate.
//!
//! Every fallible operation on the tunables file returns [`IoError`]; the
//! engine treats these as best-effort and logs rather than propagates them.

use thiserror::Error;

/// Main error type for ameba_io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input that parsed but is not acceptable
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

/// Result type alias for ameba_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    #[must_use]
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound(resource.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// True when the error, or the error it wraps, is a missing resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::FileSystem(e) => e.kind() == std::io::ErrorKind::NotFound,
            Self::Context { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

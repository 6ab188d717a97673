//! # Media Analysis Errors

use thiserror::Error;
use uuid::Uuid;

/// Result type for media operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Media analysis errors
#[derive(Debug, Clone, Error)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Frame extraction failed: {0}")]
    FrameExtraction(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Unknown analysis: {0}")]
    UnknownAnalysis(Uuid),
}

impl From<std::io::Error> for MediaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

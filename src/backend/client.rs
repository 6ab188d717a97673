//! # Generation Backend Trait
//!
//! One call signature over the interchangeable AI providers: submit a
//! prompt (optionally with an image) and get raw reply text back.
//! Structured-payload parsing happens above this seam, never inside it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::BackendResult;

/// Identifies which provider produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    /// Gemini (primary)
    Gemini,
    /// OpenAI (secondary)
    OpenAi,
    /// Merged result of both providers
    Consensus,
}

impl BackendId {
    /// Returns the identifier persisted alongside results
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Gemini => "gemini",
            BackendId::OpenAi => "openai",
            BackendId::Consensus => "consensus",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An image handed to a vision endpoint
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// MIME type, e.g. "image/jpeg"
    pub mime_type: String,
    /// Raw encoded image bytes
    pub data: Vec<u8>,
}

impl ImagePayload {
    /// Wrap JPEG bytes
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            mime_type: "image/jpeg".to_string(),
            data,
        }
    }
}

/// Backend trait for text and vision generation
///
/// One network call per invocation, no retries. Implementations map
/// transport and non-2xx failures to `BackendError::Transport` and
/// missing reply content to `BackendError::MalformedReply`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Which provider this handle talks to
    fn id(&self) -> BackendId;

    /// Submit a text prompt, returning the raw reply text
    async fn generate(&self, prompt: &str) -> BackendResult<String>;

    /// Submit a prompt plus an image, returning the raw reply text
    async fn generate_vision(&self, prompt: &str, image: &ImagePayload) -> BackendResult<String>;
}

//! # AI Provider Backends
//!
//! Two interchangeable providers behind one generation trait, plus the
//! fence-unwrapping utility for their structured replies. Handles are
//! constructor-injected wherever they are used; there is no process-wide
//! client state.

pub mod client;
pub mod errors;
pub mod gemini;
pub mod openai;
pub mod payload;

pub use client::{BackendId, GenerationBackend, ImagePayload};
pub use errors::{BackendError, BackendResult};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use payload::unwrap_fences;

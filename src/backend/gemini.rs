//! # Gemini Client
//!
//! Thin client for the Gemini `generateContent` REST endpoint. Text
//! prompts go out as a single text part; vision prompts add an
//! `inline_data` part with the base64 image.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::config::Settings;

use super::client::{BackendId, GenerationBackend, ImagePayload};
use super::errors::{BackendError, BackendResult};

/// Gemini REST client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client from settings
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: settings.gemini_api_key.clone(),
            model: settings.gemini_model.clone(),
            base_url: settings.gemini_base_url.clone(),
        }
    }

    async fn generate_content(&self, parts: Vec<Part>) -> BackendResult<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(BackendError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Transport(format!(
                "gemini returned HTTP {}",
                status.as_u16()
            )));
        }

        let reply: GenerateResponse = response.json().await.map_err(BackendError::malformed)?;

        reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| BackendError::malformed("reply contained no candidate text"))
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    fn id(&self) -> BackendId {
        BackendId::Gemini
    }

    async fn generate(&self, prompt: &str) -> BackendResult<String> {
        self.generate_content(vec![Part::text(prompt)]).await
    }

    async fn generate_vision(&self, prompt: &str, image: &ImagePayload) -> BackendResult<String> {
        let parts = vec![
            Part::text(prompt),
            Part::inline(&image.mime_type, BASE64.encode(&image.data)),
        ];
        self.generate_content(parts).await
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline(mime_type: &str, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ReplyContent>,
}

#[derive(Debug, Deserialize)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: String,
}

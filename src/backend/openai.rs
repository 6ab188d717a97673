//! # OpenAI Client
//!
//! Thin client for the chat-completions endpoint, always in
//! `json_object` response mode. Vision prompts attach the image as a
//! base64 data URL content part.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::config::Settings;

use super::client::{BackendId, GenerationBackend, ImagePayload};
use super::errors::{BackendError, BackendResult};

const SYSTEM_PROMPT: &str =
    "You are an expert fact-checker with deep knowledge of current events and crisis situations.";

/// OpenAI chat-completions client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build a client from settings
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: settings.openai_api_key.clone(),
            model: settings.openai_model.clone(),
            base_url: settings.openai_base_url.clone(),
        }
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> BackendResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: 0.2,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(BackendError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Transport(format!(
                "openai returned HTTP {}",
                status.as_u16()
            )));
        }

        let reply: ChatResponse = response.json().await.map_err(BackendError::malformed)?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| BackendError::malformed("reply contained no message content"))
    }
}

#[async_trait]
impl GenerationBackend for OpenAiClient {
    fn id(&self) -> BackendId {
        BackendId::OpenAi
    }

    async fn generate(&self, prompt: &str) -> BackendResult<String> {
        let messages = vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
            },
            ChatMessage {
                role: "user",
                content: MessageContent::Text(prompt.to_string()),
            },
        ];
        self.chat(messages).await
    }

    async fn generate_vision(&self, prompt: &str, image: &ImagePayload) -> BackendResult<String> {
        let data_url = format!(
            "data:{};base64,{}",
            image.mime_type,
            BASE64.encode(&image.data)
        );
        let messages = vec![ChatMessage {
            role: "user",
            content: MessageContent::Parts(vec![
                ContentPart::text(prompt),
                ContentPart::image_url(data_url),
            ]),
        }];
        self.chat(messages).await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
struct ContentPart {
    #[serde(rename = "type")]
    part_type: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<ImageUrl>,
}

impl ContentPart {
    fn text(text: &str) -> Self {
        Self {
            part_type: "text",
            text: Some(text.to_string()),
            image_url: None,
        }
    }

    fn image_url(url: String) -> Self {
        Self {
            part_type: "image_url",
            text: None,
            image_url: Some(ImageUrl { url }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape_is_json_object_mode() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: MessageContent::Text("hi".to_string()),
            }],
            temperature: 0.2,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_vision_part_serializes_as_image_url() {
        let part = ContentPart::image_url("data:image/jpeg;base64,AAAA".to_string());
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "image_url");
        assert!(json["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg"));
    }

    #[test]
    fn test_reply_content_extraction_shape() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"{\"verdict\":\"mixed\"}"}}]}"#;
        let reply: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(reply.choices[0]
            .message
            .content
            .as_ref()
            .unwrap()
            .contains("mixed"));
    }
}

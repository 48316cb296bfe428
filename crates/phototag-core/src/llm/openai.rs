//! OpenAI vision provider using the Chat Completions API.
//!
//! Sends the image via data URL in the user message content array, with the
//! keywording instruction as a system message.

use super::provider::{Detail, VisionProvider, VisionRequest, VisionResponse};
use crate::error::TaggingError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl OpenAiProvider {
    /// Create with a custom endpoint (OpenAI-compatible gateways, proxies).
    pub fn with_endpoint(api_key: &str, endpoint: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            timeout,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ChatContent>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
    detail: Detail,
}

impl ChatRequest {
    fn from_request(request: &VisionRequest) -> Self {
        Self {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: MessageContent::Text(request.system_prompt.clone()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: MessageContent::Parts(vec![
                        ChatContent::Text {
                            text: request.prompt.clone(),
                        },
                        ChatContent::ImageUrl {
                            image_url: ImageUrl {
                                url: request.image.data_url(),
                                detail: request.detail,
                            },
                        },
                    ]),
                },
            ],
        }
    }
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

/// Pull the generated text out of a Chat Completions body.
fn parse_chat_response(body: &str) -> Result<(String, String, Option<u32>), TaggingError> {
    let chat_resp: ChatResponse =
        serde_json::from_str(body).map_err(|e| TaggingError::MalformedResponse {
            message: format!("Failed to parse OpenAI response: {e}"),
        })?;

    let text = chat_resp
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| TaggingError::MalformedResponse {
            message: "OpenAI returned no content".to_string(),
        })?;

    Ok((
        text.trim().to_string(),
        chat_resp.model,
        chat_resp.usage.map(|u| u.total_tokens),
    ))
}

/// Map a non-success HTTP status to the error the retry policy acts on.
fn status_error(status: reqwest::StatusCode, body: String) -> TaggingError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        TaggingError::RateLimited {
            message: format!("OpenAI HTTP {status}: {body}"),
        }
    } else {
        TaggingError::Http {
            status_code: status.as_u16(),
            message: format!("OpenAI: {body}"),
        }
    }
}

#[async_trait]
impl VisionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &VisionRequest) -> Result<VisionResponse, TaggingError> {
        let start = Instant::now();
        let body = ChatRequest::from_request(request);

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TaggingError::Timeout {
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    TaggingError::Network {
                        message: format!("OpenAI request failed: {e}"),
                    }
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error(status, text));
        }

        let raw = resp.text().await.map_err(|e| TaggingError::Network {
            message: format!("Failed to read OpenAI response body: {e}"),
        })?;
        let (text, model, tokens_used) = parse_chat_response(&raw)?;

        Ok(VisionResponse {
            text,
            model,
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

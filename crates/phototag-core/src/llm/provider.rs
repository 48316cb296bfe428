//! Vision provider trait and request/response types.
//!
//! Defines the interface a vision API backend implements, plus the factory
//! that creates the configured provider and resolves its credential.

use crate::config::Config;
use crate::error::{ConfigError, TaggingError};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base64-encoded image ready to send to a vision API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and format string.
    ///
    /// The format is the image format identifier (e.g., "jpeg", "png", "webp").
    /// Returns `None` for formats vision APIs do not accept (TIFF, BMP, HEIC...).
    pub fn from_bytes(bytes: &[u8], format: &str) -> Option<Self> {
        let media_type = Self::media_type(format)?;
        Some(Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        })
    }

    /// MIME type for a format the API accepts.
    pub fn media_type(format: &str) -> Option<&'static str> {
        match format.to_lowercase().as_str() {
            "jpeg" | "jpg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "webp" => Some("image/webp"),
            "gif" => Some("image/gif"),
            _ => None,
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Image detail level: trades cost and speed against accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detail {
    Low,
    #[default]
    High,
    Auto,
}

impl std::str::FromStr for Detail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown detail level: {other}")),
        }
    }
}

impl std::fmt::Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Detail::Low => write!(f, "low"),
            Detail::High => write!(f, "high"),
            Detail::Auto => write!(f, "auto"),
        }
    }
}

const KEYWORDING_SYSTEM_PROMPT: &str = "You are a professional stock-photo keywording assistant. \
     Provide accurate, searchable keywords that describe the image content, composition, \
     mood, colors, and potential commercial uses.";

/// A request to generate keywords for an image.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// The image to describe
    pub image: ImageInput,
    /// System instruction
    pub system_prompt: String,
    /// User prompt sent alongside the image
    pub prompt: String,
    /// Vision model identifier
    pub model: String,
    /// Image detail level
    pub detail: Detail,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl VisionRequest {
    /// Build the stock-photo keywording request.
    pub fn keywords(image: ImageInput, model: &str, detail: Detail, max_tags: usize) -> Self {
        let prompt = format!(
            "Return a comma-separated list of up to {max_tags} concise, lowercase keywords. \
             Include: subject matter, actions, setting, time of day, weather, colors, mood, \
             composition style, and potential commercial applications. \
             Be specific and avoid generic terms."
        );

        Self {
            image,
            system_prompt: KEYWORDING_SYSTEM_PROMPT.to_string(),
            prompt,
            model: model.to_string(),
            detail,
            max_tokens: 150,
            temperature: 0.2,
        }
    }

    /// Override the sampling parameters.
    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }
}

/// The response from a vision call.
#[derive(Debug, Clone)]
pub struct VisionResponse {
    /// Generated text
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all vision providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn VisionProvider>` for dynamic dispatch).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logging (e.g., "openai").
    fn name(&self) -> &str;

    /// Generate text for the given request.
    async fn generate(&self, request: &VisionRequest) -> Result<VisionResponse, TaggingError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the configured provider.
pub struct VisionProviderFactory;

impl VisionProviderFactory {
    /// Create the OpenAI provider, resolving its API key up front.
    ///
    /// A missing key fails here, before any file is read or request sent.
    pub fn create(config: &Config) -> Result<Box<dyn VisionProvider>, ConfigError> {
        let cfg = &config.openai;
        let api_key =
            resolve_env_var(&cfg.api_key).ok_or_else(|| ConfigError::MissingCredential {
                provider: "OpenAI",
                env_var: env_var_name(&cfg.api_key).unwrap_or("OPENAI_API_KEY").to_string(),
            })?;
        Ok(Box::new(super::openai::OpenAiProvider::with_endpoint(
            &api_key,
            &cfg.endpoint,
            Duration::from_millis(config.tagger.timeout_ms),
        )))
    }
}

fn env_var_name(value: &str) -> Option<&str> {
    value.strip_prefix("${").and_then(|v| v.strip_suffix('}'))
}

//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Directory scan settings for `inspect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions (lowercase, without dot) treated as photos
    pub supported_formats: Vec<String>,

    /// Descend into subdirectories by default
    pub recursive: bool,

    /// Resolve GPS coordinates to a place name
    pub reverse_geocode: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            supported_formats: [
                "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "heic", "heif",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            recursive: false,
            reverse_geocode: true,
        }
    }
}

/// Vision tagging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Vision model identifier
    pub model: String,

    /// Image detail level: "low", "high" or "auto"
    pub detail: String,

    /// Maximum number of keywords requested from the model
    pub max_tags: usize,

    /// Consult and update the tag cache
    pub use_cache: bool,

    /// Completion token budget
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Extra attempts for retryable failures (429, 5xx, timeouts)
    pub retry_attempts: u32,

    /// Base backoff delay between retries in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            detail: "high".to_string(),
            max_tags: 30,
            use_cache: true,
            max_tokens: 150,
            temperature: 0.2,
            timeout_ms: 60_000,
            retry_attempts: 0,
            retry_delay_ms: 2000,
        }
    }
}

/// Tag cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache file location (supports `~`)
    pub path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: "~/.phototag/tag_cache.json".to_string(),
        }
    }
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Chat Completions endpoint
    pub endpoint: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

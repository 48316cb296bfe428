//! Error types for inspection, caching and tagging.
//!
//! Errors are organized by component so that messages carry the context a
//! user needs (file paths, HTTP status, config keys). Per-file errors are
//! meant to be reported and skipped; configuration errors are fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for phototag operations.
#[derive(Error, Debug)]
pub enum PhototagError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Directory scan errors
    #[error("Inspect error: {0}")]
    Inspect(#[from] InspectError),

    /// Tag cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Tagging call errors
    #[error("Tagging error: {0}")]
    Tagging(#[from] TaggingError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// An API credential could not be resolved
    #[error("{provider} API key not set. Set the {env_var} environment variable.")]
    MissingCredential {
        provider: &'static str,
        env_var: String,
    },
}

/// Errors raised while scanning a directory for photos.
#[derive(Error, Debug)]
pub enum InspectError {
    /// The scan root does not exist or is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A file could not be opened or its attributes read
    #[error("Cannot read {path}: {message}")]
    FileNotReadable { path: PathBuf, message: String },

    /// The file content is not a format the image decoder understands
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },
}

/// Errors reading or writing the persisted tag cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache file exists but could not be read
    #[error("Failed to read tag cache {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cache file is not valid cache JSON
    #[error("Tag cache {path} is corrupt: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The cache file was written by an incompatible schema version
    #[error("Tag cache {path} has unsupported version {found} (expected {expected})")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// The cache could not be written back
    #[error("Failed to write tag cache {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a single tagging attempt.
///
/// None of these ever result in a cache entry.
#[derive(Error, Debug)]
pub enum TaggingError {
    /// The photo does not exist
    #[error("Photo not found: {0}")]
    FileNotFound(PathBuf),

    /// The photo exists but could not be read
    #[error("Cannot read {path}: {message}")]
    FileNotReadable { path: PathBuf, message: String },

    /// The photo's format cannot be sent to the vision API
    #[error("Unsupported image format '{format}' for {path} (expected JPEG, PNG, WebP or GIF)")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// The request never produced an HTTP response (DNS, connect, TLS...)
    #[error("Network failure: {message}")]
    Network { message: String },

    /// The API answered 429
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// Any other non-success HTTP status
    #[error("HTTP {status_code}: {message}")]
    Http { status_code: u16, message: String },

    /// The call did not complete within the configured timeout
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The API answered but the body held no usable keywords
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

/// Convenience type alias for phototag results.
pub type Result<T> = std::result::Result<T, PhototagError>;

/// Convenience type alias for tagging results.
pub type TaggingResult<T> = std::result::Result<T, TaggingError>;

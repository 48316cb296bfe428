//! Cached keyword tagging of photos through a vision provider.
//!
//! The cache is consulted before any network I/O; a hit returns the stored
//! keywords without touching the provider. Only successful, non-empty
//! results are written to the cache.

use std::path::{Path, PathBuf};

use crate::cache::{CacheKey, TagCache};
use crate::config::{Config, TaggerConfig};
use crate::error::{CacheError, ConfigError, TaggingError, TaggingResult};
use crate::llm::{
    backoff_duration, is_retryable, Detail, ImageInput, VisionProvider, VisionProviderFactory,
    VisionRequest,
};
use crate::pipeline::{format_to_string, ImageProbe};
use crate::types::{TagList, TaggedPhoto, TaggingStats};

use super::parse::parse_tags;

/// Per-call tagging options.
#[derive(Debug, Clone)]
pub struct TagOptions {
    /// Vision model identifier
    pub model: String,
    /// Image detail level
    pub detail: Detail,
    /// Consult and update the cache
    pub use_cache: bool,
    /// Maximum keywords to ask for
    pub max_tags: usize,
}

impl TagOptions {
    /// Options from the `[tagger]` config section.
    ///
    /// An unparseable detail level falls back to `high`; config validation
    /// rejects it before this point for loaded files.
    pub fn from_config(config: &TaggerConfig) -> Self {
        Self {
            model: config.model.clone(),
            detail: config.detail.parse().unwrap_or_default(),
            use_cache: config.use_cache,
            max_tags: config.max_tags,
        }
    }
}

impl Default for TagOptions {
    fn default() -> Self {
        Self::from_config(&TaggerConfig::default())
    }
}

/// Retry and sampling knobs applied to every request.
#[derive(Debug, Clone)]
struct RequestPolicy {
    retry_attempts: u32,
    retry_delay_ms: u64,
    max_tokens: u32,
    temperature: f32,
}

impl From<&TaggerConfig> for RequestPolicy {
    fn from(config: &TaggerConfig) -> Self {
        Self {
            retry_attempts: config.retry_attempts,
            retry_delay_ms: config.retry_delay_ms,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Tags photos, one at a time, backed by a [`TagCache`].
pub struct Tagger {
    provider: Box<dyn VisionProvider>,
    cache: TagCache,
    cache_path: Option<PathBuf>,
    policy: RequestPolicy,
}

impl Tagger {
    /// Create a tagger over an already-loaded cache.
    ///
    /// Without a cache path, [`Tagger::save_cache`] is a no-op.
    pub fn new(provider: Box<dyn VisionProvider>, cache: TagCache) -> Self {
        Self {
            provider,
            cache,
            cache_path: None,
            policy: RequestPolicy::from(&TaggerConfig::default()),
        }
    }

    /// Build the configured provider and load the cache from its configured path.
    ///
    /// Fails fast on a missing API key.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let provider = VisionProviderFactory::create(config)?;
        let cache_path = config.cache_path();
        let cache = TagCache::load(&cache_path);
        Ok(Self::new(provider, cache)
            .with_cache_path(cache_path)
            .with_tagger_config(&config.tagger))
    }

    /// Persist the cache to `path` on [`Tagger::save_cache`].
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Apply retry and sampling settings.
    pub fn with_tagger_config(mut self, config: &TaggerConfig) -> Self {
        self.policy = RequestPolicy::from(config);
        self
    }

    /// Override the number of retries for transient failures.
    pub fn with_retries(mut self, attempts: u32) -> Self {
        self.policy.retry_attempts = attempts;
        self
    }

    /// The in-memory cache.
    pub fn cache(&self) -> &TagCache {
        &self.cache
    }

    /// Where the cache is persisted, if anywhere.
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// Tag one photo and return its keywords.
    pub async fn tag_photo(&mut self, path: &Path, options: &TagOptions) -> TaggingResult<TagList> {
        self.tag(path, options).await.map(|t| t.tags)
    }

    /// Tag one photo, reporting whether the result came from the cache.
    pub async fn tag(&mut self, path: &Path, options: &TagOptions) -> TaggingResult<TaggedPhoto> {
        let name = display_name(path);
        let bytes = read_photo(path).await?;

        let key = options.use_cache.then(|| CacheKey::from_bytes(&bytes));
        if let Some(key) = &key {
            if let Some(tags) = self.cache.get(key) {
                tracing::info!("Using cached tags for {name}");
                return Ok(TaggedPhoto {
                    file_path: path.to_path_buf(),
                    tags: tags.to_vec(),
                    cached: true,
                });
            }
        }

        tracing::info!("Tagging {name} with {}...", options.model);
        let format = ImageProbe::sniff_format(&bytes)
            .map(format_to_string)
            .unwrap_or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("jpeg")
                    .to_lowercase()
            });
        let image = ImageInput::from_bytes(&bytes, &format).ok_or_else(|| {
            TaggingError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: format.clone(),
            }
        })?;
        drop(bytes);

        let request = VisionRequest::keywords(image, &options.model, options.detail, options.max_tags)
            .with_sampling(self.policy.max_tokens, self.policy.temperature);
        let tags = self.request_tags(&request, path).await?;

        tracing::info!("Generated {} tags for {name}", tags.len());
        if let Some(key) = key {
            self.cache.put(key, tags.clone());
        }

        Ok(TaggedPhoto {
            file_path: path.to_path_buf(),
            tags,
            cached: false,
        })
    }

    /// Tag photos sequentially; one failure never stops the rest.
    ///
    /// `on_result` sees each outcome as it completes.
    pub async fn tag_batch<F>(
        &mut self,
        paths: &[PathBuf],
        options: &TagOptions,
        mut on_result: F,
    ) -> TaggingStats
    where
        F: FnMut(&Path, &TaggingResult<TaggedPhoto>),
    {
        let mut stats = TaggingStats::default();
        let total = paths.len();

        for (i, path) in paths.iter().enumerate() {
            tracing::debug!("Processing {}/{total}: {}", i + 1, display_name(path));
            let result = self.tag(path, options).await;
            match &result {
                Ok(tagged) if tagged.cached => stats.cache_hits += 1,
                Ok(_) => stats.tagged += 1,
                Err(e) => {
                    tracing::error!("Failed to tag {}: {e}", display_name(path));
                    stats.failed += 1;
                }
            }
            on_result(path, &result);
        }

        stats
    }

    /// Write the cache back if it changed and a path is configured.
    ///
    /// Returns whether a write happened.
    pub fn save_cache(&mut self) -> Result<bool, CacheError> {
        match &self.cache_path {
            Some(path) => self.cache.save_if_dirty(path),
            None => Ok(false),
        }
    }

    /// Call the provider with retries and parse the answer.
    async fn request_tags(
        &self,
        request: &VisionRequest,
        path: &Path,
    ) -> TaggingResult<TagList> {
        let timeout = self.provider.timeout();
        let mut attempt = 0;
        loop {
            let outcome = match tokio::time::timeout(timeout, self.provider.generate(request)).await
            {
                Ok(result) => result,
                Err(_) => Err(TaggingError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }),
            };

            let error = match outcome {
                Ok(response) => {
                    tracing::debug!(
                        "{} answered in {}ms ({} tokens)",
                        response.model,
                        response.latency_ms,
                        response
                            .tokens_used
                            .map(|t| t.to_string())
                            .unwrap_or_else(|| "?".to_string())
                    );
                    let tags = parse_tags(&response.text);
                    if tags.is_empty() {
                        return Err(TaggingError::MalformedResponse {
                            message: format!("no keywords in response: {:?}", response.text),
                        });
                    }
                    return Ok(tags);
                }
                Err(e) => e,
            };

            if attempt >= self.policy.retry_attempts || !is_retryable(&error) {
                return Err(error);
            }
            let delay = backoff_duration(attempt, self.policy.retry_delay_ms);
            attempt += 1;
            tracing::warn!(
                "Tagging attempt {attempt}/{} failed for {}: {error}; retrying in {delay:?}",
                self.policy.retry_attempts + 1,
                display_name(path)
            );
            tokio::time::sleep(delay).await;
        }
    }
}

async fn read_photo(path: &Path) -> TaggingResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TaggingError::FileNotFound(path.to_path_buf())
        } else {
            TaggingError::FileNotReadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        }
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

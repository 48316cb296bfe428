//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::llm::Detail;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "scan.supported_formats must not be empty".into(),
            ));
        }
        if self.tagger.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "tagger.model must not be empty".into(),
            ));
        }
        if self.tagger.detail.parse::<Detail>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "tagger.detail must be one of low, high, auto (got {:?})",
                self.tagger.detail
            )));
        }
        if self.tagger.max_tags == 0 {
            return Err(ConfigError::ValidationError(
                "tagger.max_tags must be > 0".into(),
            ));
        }
        if self.tagger.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "tagger.max_tokens must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.tagger.temperature) {
            return Err(ConfigError::ValidationError(
                "tagger.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.tagger.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tagger.timeout_ms must be > 0".into(),
            ));
        }
        if self.cache.path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "cache.path must not be empty".into(),
            ));
        }
        Ok(())
    }
}

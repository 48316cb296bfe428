//! Configuration management for phototag.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. All config structs implement `Default`, so an absent file or an
//! absent section falls back to built-in values.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for phototag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scan settings
    pub scan: ScanConfig,

    /// Vision tagging settings
    pub tagger: TaggerConfig,

    /// Tag cache settings
    pub cache: CacheConfig,

    /// OpenAI provider settings
    pub openai: OpenAiConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.phototag.phototag/config.toml
    /// - Linux: ~/.config/phototag/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\phototag\config\config.toml
    ///
    /// Falls back to ~/.phototag/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "phototag", "phototag")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".phototag").join("config.toml")
            })
    }

    /// Get the resolved tag cache path (with ~ expansion).
    pub fn cache_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.cache.path);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tagger.model, "gpt-4o-mini");
        assert_eq!(config.tagger.max_tags, 30);
        assert!(config.tagger.use_cache);
        assert!(!config.scan.recursive);
        assert!(config.scan.supported_formats.contains(&"jpg".to_string()));
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[scan]"));
        assert!(toml.contains("[tagger]"));
        assert!(toml.contains("[cache]"));
        assert!(toml.contains("[openai]"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tagger]\nmodel = \"gpt-4o\"\ndetail = \"low\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tagger.model, "gpt-4o");
        assert_eq!(config.tagger.detail, "low");
        assert_eq!(config.tagger.max_tags, 30);
        assert_eq!(config.cache.path, "~/.phototag/tag_cache.json");
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tagger\nmodel = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_cache_path_expands_tilde() {
        let config = Config::default();
        let path = config.cache_path();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with(".phototag/tag_cache.json"));
    }
}

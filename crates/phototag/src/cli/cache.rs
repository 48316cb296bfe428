//! The `phototag cache` command for tag cache management.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use phototag_core::{CacheKey, Config, TagCache};

/// Arguments for the `cache` command.
#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Tag cache file to use instead of the configured one
    #[arg(long, global = true, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Subcommands for cache management.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Show the cache file path
    Path,

    /// Show entry counts and file size
    Stats,

    /// Show the cached tags for a photo, if any
    Lookup {
        /// Photo to look up
        photo: PathBuf,
    },

    /// Remove every cached entry
    Clear,
}

/// Execute the cache command.
pub fn execute(args: CacheArgs, config: &Config) -> anyhow::Result<()> {
    let path = args.cache.unwrap_or_else(|| config.cache_path());

    match args.command {
        CacheCommand::Path => println!("{}", path.display()),

        CacheCommand::Stats => {
            let cache = load_strict(&path)?;
            let tags: usize = cache.iter().map(|(_, tags)| tags.len()).sum();
            let bytes = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

            println!("Path:     {}", path.display());
            println!("Entries:  {}", cache.len());
            println!("Tags:     {tags}");
            if !cache.is_empty() {
                println!("Average:  {:.1} tags/photo", tags as f64 / cache.len() as f64);
            }
            println!("Size:     {:.1} KB", bytes as f64 / 1024.0);
        }

        CacheCommand::Lookup { photo } => {
            let key = CacheKey::for_file(&photo)
                .with_context(|| format!("Cannot read {}", photo.display()))?;
            let cache = load_strict(&path)?;
            println!("Key:  {key}");
            match cache.get(&key) {
                Some(tags) => println!("Tags: {}", tags.join(", ")),
                None => println!("Tags: (not cached)"),
            }
        }

        CacheCommand::Clear => {
            let removed = TagCache::try_load(&path).map(|c| c.len()).unwrap_or(0);
            TagCache::new()
                .save(&path)
                .with_context(|| format!("Cannot clear {}", path.display()))?;
            tracing::info!("Cleared tag cache at {}", path.display());
            println!("Removed {removed} cached entries");
        }
    }

    Ok(())
}

/// Unlike tagging, maintenance commands surface a corrupt cache file.
fn load_strict(path: &Path) -> anyhow::Result<TagCache> {
    TagCache::try_load(path).with_context(|| format!("Cannot read tag cache {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cache: &Path, command: CacheCommand) -> CacheArgs {
        CacheArgs {
            cache: Some(cache.to_path_buf()),
            command,
        }
    }

    #[test]
    fn test_clear_empties_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.json");
        let mut cache = TagCache::new();
        cache.put(CacheKey::from_bytes(b"photo"), vec!["beach".to_string()]);
        cache.save(&path).unwrap();

        execute(args(&path, CacheCommand::Clear), &Config::default()).unwrap();

        assert!(TagCache::try_load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_stats_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(execute(args(&path, CacheCommand::Stats), &Config::default()).is_ok());
    }

    #[test]
    fn test_stats_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(execute(args(&path, CacheCommand::Stats), &Config::default()).is_err());
    }

    #[test]
    fn test_lookup_missing_photo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.json");
        let command = CacheCommand::Lookup {
            photo: dir.path().join("nope.jpg"),
        };
        assert!(execute(args(&path, command), &Config::default()).is_err());
    }
}

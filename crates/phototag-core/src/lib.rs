//! Phototag Core - photo metadata inspection and cached vision-API tagging.
//!
//! Two independent tools share this library:
//!
//! ```text
//! inspect:  Directory → Discover → Probe + EXIF → (Reverse geocode) → PhotoRecord
//! tag:      Photo → Content hash → Cache hit? ──yes──→ TagList
//!                                      │ no
//!                                      └→ Vision API → Parse → Cache → TagList
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use phototag_core::{Config, TagOptions};
//!
//! #[tokio::main]
//! async fn main() -> phototag_core::Result<()> {
//!     let config = Config::load()?;
//!     let options = TagOptions::from_config(&config.tagger);
//!     let tags = phototag_core::tag_photo("./beach.jpg".as_ref(), &config, &options).await?;
//!     println!("Tags: {}", tags.join(", "));
//!     Ok(())
//! }
//! ```

use std::path::Path;

// Module declarations
pub mod cache;
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod tagging;
pub mod types;

// Re-exports for convenient access
pub use cache::{CacheKey, TagCache};
pub use config::Config;
pub use error::{
    CacheError, ConfigError, InspectError, PhototagError, Result, TaggingError, TaggingResult,
};
pub use llm::Detail;
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::Inspector;
pub use tagging::{parse_tags, TagOptions, Tagger};
pub use types::{ExifData, GpsCoordinate, PhotoRecord, Place, TagList, TaggedPhoto, TaggingStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tag a single photo using the configured provider and cache file.
///
/// Loads the cache, tags the photo (hitting the network only on a miss), and
/// writes the cache back if it changed. For many photos, build a [`Tagger`]
/// once and call [`Tagger::tag_batch`] instead.
pub async fn tag_photo(path: &Path, config: &Config, options: &TagOptions) -> Result<TagList> {
    let mut tagger = Tagger::from_config(config)?;
    let tags = tagger.tag_photo(path, options).await?;
    tagger.save_cache()?;
    Ok(tags)
}

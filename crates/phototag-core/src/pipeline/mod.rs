//! Photo inspection components.
//!
//! - **discovery**: Find photo files in directories
//! - **hash**: Content hashing used for cache keys
//! - **probe**: Read format and dimensions from image headers
//! - **metadata**: Extract EXIF metadata (camera, capture time, GPS)
//! - **geocode**: Offline reverse geocoding of GPS coordinates
//! - **inspector**: Ties the above into a per-directory scan

pub mod discovery;
pub mod geocode;
pub mod hash;
pub mod inspector;
pub mod metadata;
pub mod probe;

// Re-exports for convenient access
pub use discovery::FileDiscovery;
pub use geocode::{OfflineGeocoder, ReverseGeocode};
pub use hash::Hasher;
pub use inspector::Inspector;
pub use metadata::MetadataExtractor;
pub use probe::{format_to_string, ImageInfo, ImageProbe};

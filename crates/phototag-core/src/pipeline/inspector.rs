//! Directory inspection: one `PhotoRecord` per discovered photo.

use chrono::{DateTime, Local};
use std::cell::OnceCell;
use std::path::Path;

use crate::config::ScanConfig;
use crate::error::InspectError;
use crate::types::PhotoRecord;

use super::discovery::FileDiscovery;
use super::geocode::{OfflineGeocoder, ReverseGeocode};
use super::metadata::MetadataExtractor;
use super::probe::{format_to_string, ImageProbe};

/// Scans directories and reports file, image and EXIF attributes.
///
/// Strictly read-only. A file that cannot be read produces a record marked
/// unreadable; it never aborts the scan.
pub struct Inspector {
    discovery: FileDiscovery,
    reverse_geocode: bool,
    geocoder: OnceCell<Box<dyn ReverseGeocode>>,
}

impl Inspector {
    /// Create an inspector. The offline geocoder is loaded on first use.
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            discovery: FileDiscovery::new(config.clone()),
            reverse_geocode: config.reverse_geocode,
            geocoder: OnceCell::new(),
        }
    }

    /// Use a specific geocoder instead of the bundled offline database.
    pub fn with_geocoder(mut self, geocoder: Box<dyn ReverseGeocode>) -> Self {
        self.reverse_geocode = true;
        self.geocoder = OnceCell::from(geocoder);
        self
    }

    /// Enable or disable reverse geocoding.
    pub fn set_reverse_geocode(&mut self, enabled: bool) {
        self.reverse_geocode = enabled;
    }

    /// Scan `root` and lazily inspect each supported file, in path order.
    ///
    /// Fails only if `root` is not an existing directory.
    pub fn scan<'a>(
        &'a self,
        root: &Path,
        recursive: bool,
    ) -> Result<impl Iterator<Item = PhotoRecord> + 'a, InspectError> {
        if !root.is_dir() {
            return Err(InspectError::NotADirectory(root.to_path_buf()));
        }
        let files = self.discovery.discover(root, recursive);
        tracing::debug!("Discovered {} photo(s) under {:?}", files.len(), root);
        Ok(files.into_iter().map(move |path| self.inspect(&path)))
    }

    /// Inspect a single file.
    pub fn inspect(&self, path: &Path) -> PhotoRecord {
        let mut record = PhotoRecord::new(path.to_path_buf());

        let meta = match std::fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) => {
                let err = InspectError::FileNotReadable {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                };
                tracing::warn!("{err}");
                record.unreadable = Some(e.to_string());
                return record;
            }
        };
        record.file_size = meta.len();
        record.modified = meta.modified().ok().map(DateTime::<Local>::from);

        match ImageProbe::probe(path) {
            Ok(info) => {
                record.width = Some(info.width);
                record.height = Some(info.height);
                record.format = Some(format_to_string(info.format));
            }
            Err(e) => {
                tracing::warn!("{e}");
                record.unreadable = Some(match e {
                    InspectError::UnsupportedFormat { format, .. } => {
                        format!("unsupported format: {format}")
                    }
                    InspectError::FileNotReadable { message, .. } => message,
                    other => other.to_string(),
                });
            }
        }

        record.exif = MetadataExtractor::extract(path);

        if self.reverse_geocode {
            if let Some(gps) = record.gps() {
                let geocoder = self
                    .geocoder
                    .get_or_init(|| Box::new(OfflineGeocoder::new()) as Box<dyn ReverseGeocode>);
                record.place = geocoder.lookup(gps);
                if record.place.is_none() {
                    tracing::debug!("No place found for {:?}", gps);
                }
            }
        }

        record
    }
}

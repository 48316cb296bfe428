//! File discovery for finding photos in directories.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ScanConfig;

/// Discovers photo files in directories.
pub struct FileDiscovery {
    config: ScanConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Discover all supported photo files at a path.
    ///
    /// If path is a file, returns it if supported.
    /// If path is a directory, lists its supported files; subdirectories are
    /// only descended into when `recursive` is set.
    pub fn discover(&self, path: &Path, recursive: bool) -> Vec<PathBuf> {
        if path.is_file() {
            if self.is_supported(path) {
                return vec![path.to_path_buf()];
            }
            return vec![];
        }

        let mut walker = WalkDir::new(path).follow_links(true).min_depth(1);
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut files = Vec::new();

        for entry in walker.into_iter().filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!("Skipping unreadable entry: {err}");
                None
            }
        }) {
            let entry_path = entry.path();
            if entry_path.is_file() && self.is_supported(entry_path) {
                files.push(entry_path.to_path_buf());
            } else {
                tracing::trace!("Skipping non-photo entry: {:?}", entry_path);
            }
        }

        // Sort by path for deterministic ordering
        files.sort();
        files
    }

    /// Check if a file has a supported extension.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }
}

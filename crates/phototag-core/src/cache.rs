//! File-persisted tag cache.
//!
//! Maps a photo's content hash to the keywords a previous successful tagging
//! call returned, so the same photo is never sent to the vision API twice.
//!
//! The whole mapping is loaded at the start of a session, mutated in memory
//! and written back once at the end. There is no locking: two processes
//! tagging at the same time race on the file and the last writer wins.
//!
//! # On-disk format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "<blake3 hex>": { "tags": ["beach", "sunset", "ocean"] }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CacheError;
use crate::pipeline::Hasher;

/// Current on-disk schema version.
pub const CACHE_VERSION: u32 = 1;

/// Identity of a photo for caching: BLAKE3 hex digest of its bytes.
///
/// Identical bytes share a key wherever they live; editing a photo in place
/// gives it a new key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for an in-memory photo.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Hasher::content_hash_from_bytes(bytes))
    }

    /// Key for a photo on disk, streamed.
    pub fn for_file(path: &Path) -> std::io::Result<Self> {
        Hasher::content_hash(path).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cached tagging result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub tags: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<CacheKey, CacheEntry>,
}

/// In-memory tag cache with a dirty flag.
#[derive(Debug, Clone, Default)]
pub struct TagCache {
    entries: BTreeMap<CacheKey, CacheEntry>,
    dirty: bool,
}

impl PartialEq for TagCache {
    /// Caches are equal when their mappings are; the dirty flag is session state.
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl TagCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache, falling back to an empty one on any problem.
    ///
    /// Caching is an optimization: an absent file is normal and a corrupt
    /// one is logged and ignored (it will be overwritten on the next save).
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!("{e}; starting with an empty tag cache");
                Self::new()
            }
        }
    }

    /// Load the cache, reporting why it could not be read.
    ///
    /// An absent file is not an error and yields an empty cache.
    pub fn try_load(path: &Path) -> Result<Self, CacheError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No tag cache at {:?}, starting empty", path);
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(CacheError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let file: CacheFile =
            serde_json::from_str(&content).map_err(|source| CacheError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if file.version != CACHE_VERSION {
            return Err(CacheError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: file.version,
                expected: CACHE_VERSION,
            });
        }

        tracing::debug!("Loaded {} cached tag list(s) from {:?}", file.entries.len(), path);
        Ok(Self {
            entries: file.entries,
            dirty: false,
        })
    }

    /// Cached tags for a key. Pure lookup.
    pub fn get(&self, key: &CacheKey) -> Option<&[String]> {
        self.entries.get(key).map(|e| e.tags.as_slice())
    }

    /// Whether a key has cached tags.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite the tags for a key.
    pub fn put(&mut self, key: CacheKey, tags: Vec<String>) {
        self.entries.insert(key, CacheEntry { tags });
        self.dirty = true;
    }

    /// Drop one entry. Returns its tags if it was present.
    pub fn remove(&mut self, key: &CacheKey) -> Option<Vec<String>> {
        let removed = self.entries.remove(key).map(|e| e.tags);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.dirty = true;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&CacheKey, &[String])> {
        self.entries.iter().map(|(k, e)| (k, e.tags.as_slice()))
    }

    /// Write the complete mapping to `path`, replacing previous content.
    ///
    /// Writes a sibling temporary file and renames it into place so an
    /// interrupted save leaves the old cache intact.
    pub fn save(&mut self, path: &Path) -> Result<(), CacheError> {
        let write_err = |source: std::io::Error| CacheError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let file = CacheFile {
            version: CACHE_VERSION,
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| write_err(std::io::Error::other(e)))?;

        let tmp = tmp_path(path);
        if let Err(e) = std::fs::write(&tmp, json).and_then(|()| std::fs::rename(&tmp, path)) {
            let _ = std::fs::remove_file(&tmp);
            return Err(write_err(e));
        }

        self.dirty = false;
        tracing::debug!("Saved {} cached tag list(s) to {:?}", self.entries.len(), path);
        Ok(())
    }

    /// Save only if something changed since load or the last save.
    ///
    /// Returns whether a write happened.
    pub fn save_if_dirty(&mut self, path: &Path) -> Result<bool, CacheError> {
        if !self.dirty {
            return Ok(false);
        }
        self.save(path)?;
        Ok(true)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TagCache::load(&dir.path().join("absent.json"));
        assert!(cache.is_empty());
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        assert!(matches!(
            TagCache::try_load(&path),
            Err(CacheError::Parse { .. })
        ));
        assert!(TagCache::load(&path).is_empty());
    }

    #[test]
    fn test_unsupported_version_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, r#"{"version": 99, "entries": {}}"#).unwrap();

        assert!(matches!(
            TagCache::try_load(&path),
            Err(CacheError::UnsupportedVersion { found: 99, .. })
        ));
        assert!(TagCache::load(&path).is_empty());
    }

    #[test]
    fn test_unreadable_path_loads_empty() {
        // A directory where the file should be
        let dir = tempfile::tempdir().unwrap();
        let cache = TagCache::load(dir.path());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/cache.json");

        let mut cache = TagCache::new();
        cache.put(CacheKey::from_bytes(b"one"), tags(&["beach", "sunset", "ocean"]));
        cache.put(CacheKey::from_bytes(b"two"), tags(&["dog", "dog", "park"]));
        cache.put(CacheKey::from_bytes(b"three"), vec![]);
        cache.save(&path).unwrap();

        let loaded = TagCache::try_load(&path).unwrap();
        assert_eq!(loaded, cache);
        assert_eq!(
            loaded.get(&CacheKey::from_bytes(b"two")),
            Some(&tags(&["dog", "dog", "park"])[..])
        );
        assert!(!loaded.is_dirty());
    }

    #[test]
    fn test_reads_documented_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let key = CacheKey::from_bytes(b"photo");
        std::fs::write(
            &path,
            format!(
                r#"{{"version": 1, "entries": {{"{key}": {{"tags": ["beach","sunset","ocean"]}}}}}}"#
            ),
        )
        .unwrap();

        let cache = TagCache::try_load(&path).unwrap();
        assert_eq!(cache.get(&key), Some(&tags(&["beach", "sunset", "ocean"])[..]));
    }

    #[test]
    fn test_put_marks_dirty_and_overwrites() {
        let mut cache = TagCache::new();
        let key = CacheKey::from_bytes(b"photo");
        assert!(!cache.is_dirty());

        cache.put(key.clone(), tags(&["old"]));
        cache.put(key.clone(), tags(&["new"]));
        assert!(cache.is_dirty());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key), Some(&tags(&["new"])[..]));
    }

    #[test]
    fn test_get_does_not_mark_dirty() {
        let mut cache = TagCache::new();
        let key = CacheKey::from_bytes(b"photo");
        cache.put(key.clone(), tags(&["a"]));
        let dir = tempfile::tempdir().unwrap();
        cache.save(&dir.path().join("c.json")).unwrap();

        let _ = cache.get(&key);
        let _ = cache.get(&CacheKey::from_bytes(b"other"));
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_save_if_dirty_skips_clean_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = TagCache::new();
        assert!(!cache.save_if_dirty(&path).unwrap());
        assert!(!path.exists());

        cache.put(CacheKey::from_bytes(b"x"), tags(&["x"]));
        assert!(cache.save_if_dirty(&path).unwrap());
        assert!(path.exists());
        assert!(!cache.save_if_dirty(&path).unwrap());
    }

    #[test]
    fn test_save_keeps_prior_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut first = TagCache::new();
        first.put(CacheKey::from_bytes(b"old"), tags(&["kept"]));
        first.save(&path).unwrap();

        let mut second = TagCache::load(&path);
        second.put(CacheKey::from_bytes(b"new"), tags(&["added"]));
        second.save(&path).unwrap();

        let reloaded = TagCache::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(&CacheKey::from_bytes(b"old")));
        assert!(!dir.path().join("cache.json.tmp").exists());
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the cache file should go: the rename fails.
        let path = dir.path().join("cache.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let mut cache = TagCache::new();
        cache.put(CacheKey::from_bytes(b"x"), tags(&["x"]));

        assert!(matches!(cache.save(&path), Err(CacheError::Write { .. })));
        assert!(!dir.path().join("cache.json.tmp").exists());
        assert!(cache.is_dirty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cache = TagCache::new();
        let key = CacheKey::from_bytes(b"a");
        cache.put(key.clone(), tags(&["a"]));
        cache.put(CacheKey::from_bytes(b"b"), tags(&["b"]));

        assert_eq!(cache.remove(&key), Some(tags(&["a"])));
        assert_eq!(cache.remove(&key), None);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_key_for_file_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"pixels").unwrap();

        assert_eq!(
            CacheKey::for_file(&path).unwrap(),
            CacheKey::from_bytes(b"pixels")
        );
    }
}

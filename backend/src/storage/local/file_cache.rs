//! # File Cache
//!
//! File-backed local cache. Every key lives in its own JSON file at the root
//! of the data directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── rikedom_device_id.json
//! ├── rikedom_affirmation.json
//! ├── rikedom_reading_log.json
//! ├── rikedom_pledge.json
//! ├── rikedom_confidence_log.json
//! ├── rikedom_step_data.json
//! ├── rikedom_confidence_step_data.json
//! └── rikedom_notification_settings.json
//! ```
//!
//! Writes go to a uniquely named temp file in the same directory and are
//! renamed into place, so a crash never leaves a half-written value behind
//! and concurrent writers never share a temp file.

use anyhow::Result;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::CacheKey;
use crate::storage::LocalCache;

/// Local cache persisted as one JSON file per key
#[derive(Clone, Debug)]
pub struct FileCache {
    base_directory: PathBuf,
}

impl FileCache {
    /// Open a cache rooted at `base_directory`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created local cache directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Root directory of the cache
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    fn entry_path(&self, key: CacheKey) -> PathBuf {
        self.base_directory.join(format!("{}.json", key.as_str()))
    }
}

impl LocalCache for FileCache {
    fn get_raw(&self, key: CacheKey) -> Result<Option<String>> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_raw(&self, key: CacheKey, value: &str) -> Result<()> {
        let path = self.entry_path(key);
        let mut temp_file = NamedTempFile::new_in(&self.base_directory)?;
        temp_file.write_all(value.as_bytes())?;
        temp_file.persist(&path)?;

        debug!("Wrote cache entry {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: CacheKey) -> Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => {
                debug!("Removed cache entry {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("nested").join("cache");

        let cache = FileCache::new(&nested).expect("Failed to open cache");
        assert!(nested.exists());
        assert_eq!(cache.base_directory(), nested.as_path());
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let cache = FileCache::new(temp_dir.path()).unwrap();
        cache.set_raw(CacheKey::DeviceId, "\"device-1\"").unwrap();

        let reopened = FileCache::new(temp_dir.path()).unwrap();
        assert_eq!(
            reopened.get_raw(CacheKey::DeviceId).unwrap().as_deref(),
            Some("\"device-1\"")
        );
        assert!(temp_dir.path().join("rikedom_device_id.json").exists());
        // Only the entry itself is left in the directory
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_concurrent_writers_leave_a_complete_value() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cache = FileCache::new(temp_dir.path()).unwrap();

        let writers: Vec<_> = (0..16)
            .map(|n| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    let value = format!("[{}]", vec![n.to_string(); 200].join(","));
                    cache.set_raw(CacheKey::ReadingLog, &value).unwrap();
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let stored = cache.get_raw(CacheKey::ReadingLog).unwrap().unwrap();
        let values: Vec<u32> = serde_json::from_str(&stored).unwrap();
        assert_eq!(values.len(), 200);
        assert!(values.iter().all(|value| *value == values[0]));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_and_removed_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cache = FileCache::new(temp_dir.path()).unwrap();

        assert!(cache.get_raw(CacheKey::Pledge).unwrap().is_none());
        cache.remove(CacheKey::Pledge).unwrap();

        cache.set_raw(CacheKey::Pledge, "{}").unwrap();
        cache.set_raw(CacheKey::Pledge, "{\"principle_1\":\"x\"}").unwrap();
        assert_eq!(
            cache.get_raw(CacheKey::Pledge).unwrap().as_deref(),
            Some("{\"principle_1\":\"x\"}")
        );

        cache.remove(CacheKey::Pledge).unwrap();
        assert!(cache.get_raw(CacheKey::Pledge).unwrap().is_none());
    }
}

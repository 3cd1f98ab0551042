//! # Local Cache
//!
//! Device-local key/value storage holding JSON values, the backend's stand-in
//! for browser local storage. It keeps the device identifier, wizard drafts,
//! notification preferences, and snapshots of records and activity logs that
//! could not be written to the primary store.
//!
//! Two implementations are provided:
//!
//! - [`FileCache`]: one `<key>.json` file per key under the data directory
//! - [`MemoryCache`]: a process-local map, used for ephemeral runs and tests

pub mod file_cache;
pub mod memory_cache;

pub use file_cache::FileCache;
pub use memory_cache::MemoryCache;

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

use crate::storage::LocalCache;

/// Fixed keys of the local cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    DeviceId,
    Affirmation,
    ReadingLog,
    Pledge,
    ConfidenceLog,
    AffirmationSteps,
    PledgeSteps,
    NotificationSettings,
}

impl CacheKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::DeviceId => "rikedom_device_id",
            CacheKey::Affirmation => "rikedom_affirmation",
            CacheKey::ReadingLog => "rikedom_reading_log",
            CacheKey::Pledge => "rikedom_pledge",
            CacheKey::ConfidenceLog => "rikedom_confidence_log",
            CacheKey::AffirmationSteps => "rikedom_step_data",
            CacheKey::PledgeSteps => "rikedom_confidence_step_data",
            CacheKey::NotificationSettings => "rikedom_notification_settings",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read and decode the JSON value stored under `key`
pub fn read_json<T: DeserializeOwned>(cache: &dyn LocalCache, key: CacheKey) -> Result<Option<T>> {
    match cache.get_raw(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and store it under `key`
pub fn write_json<T: Serialize + ?Sized>(cache: &dyn LocalCache, key: CacheKey, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    cache.set_raw(key, &raw)
}

//! # Storage Traits
//!
//! Storage ports used by the domain layer. The primary store (a hosted SQL
//! database in production) is split into a record port and an activity port;
//! the local cache is a string-keyed JSON store that mirrors browser local
//! storage. Each port can be swapped for an in-memory implementation in tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::ActivityType;

use crate::domain::models::ActivityRecord;
use crate::storage::local::CacheKey;

/// Single-record-per-owner storage for one record kind
///
/// `R` is the record shape (affirmation or pledge). Implementations own the
/// conversion between that shape and their row layout.
#[async_trait]
pub trait RecordStorage<R>: Send + Sync {
    /// Fetch the record owned by `owner_id`
    async fn find_record(&self, owner_id: &str) -> Result<Option<R>>;

    /// Fetch only the id of the record owned by `owner_id`
    async fn find_record_id(&self, owner_id: &str) -> Result<Option<String>>;

    /// Insert a new record for `owner_id` and return it as stored
    async fn insert_record(&self, owner_id: &str, record: &R) -> Result<R>;

    /// Overwrite the mutable fields of an existing record and return it as stored
    async fn update_record(&self, record_id: &str, record: &R, updated_at: DateTime<Utc>) -> Result<R>;

    /// Delete every record owned by `owner_id`, returning the number of rows removed
    async fn delete_records(&self, owner_id: &str) -> Result<u64>;

    /// Move ownership of all records from one owner to another
    async fn reassign_records(&self, from_owner: &str, to_owner: &str) -> Result<u64>;
}

/// Append-only activity log storage
#[async_trait]
pub trait ActivityStorage: Send + Sync {
    /// Append one activity row
    async fn insert_activity(&self, activity: &ActivityRecord) -> Result<()>;

    /// Timestamps of all activities of one type for an owner, newest first
    async fn list_activity_times(&self, owner_id: &str, activity: ActivityType) -> Result<Vec<DateTime<Utc>>>;

    /// Whether the owner logged at least one activity of this type at or after `since`
    async fn has_activity_since(&self, owner_id: &str, activity: ActivityType, since: DateTime<Utc>) -> Result<bool>;

    /// Delete every activity row of an owner
    async fn delete_activities(&self, owner_id: &str) -> Result<u64>;

    /// Move ownership of all activity rows from one owner to another
    async fn reassign_activities(&self, from_owner: &str, to_owner: &str) -> Result<u64>;
}

/// Device-local key/value cache holding JSON-encoded values
pub trait LocalCache: Send + Sync {
    /// Raw JSON stored under `key`, if any
    fn get_raw(&self, key: CacheKey) -> Result<Option<String>>;

    /// Store raw JSON under `key`, replacing any previous value
    fn set_raw(&self, key: CacheKey, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: CacheKey) -> Result<()>;
}

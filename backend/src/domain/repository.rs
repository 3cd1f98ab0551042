//! # Record Repository
//!
//! Two-tier persistence facade for one program (affirmation or pledge).
//!
//! ## Fallback Policy
//!
//! Every operation tries the primary store first. When the primary store
//! fails (or, for reads, has no row) the operation falls back to the local
//! cache:
//!
//! - reads return the cached snapshot
//! - writes store the submitted data in the cache and return it
//! - activities are appended to the cached activity list
//!
//! Results from the two tiers are never merged and nothing is retried or
//! pushed to the primary store later, so the tiers may diverge until the next
//! successful primary write. None of the operations return an error: the
//! cache is the last resort and its own failures are only logged.
//!
//! Cached activity lists are updated read-modify-write, so every update goes
//! through a lock shared by all clones of the repository.

use anyhow::Result;
use chrono::{Local, Utc};
use shared::ActivityType;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::identity::IdentityResolver;
use crate::domain::models::{ActivityRecord, CachedActivity, RecordKind};
use crate::domain::streak::{compute_streak_local, same_calendar_day, start_of_day};
use crate::storage::local::{read_json, write_json};
use crate::storage::{ActivityStorage, LocalCache, RecordStorage};

pub struct RecordRepository<K: RecordKind> {
    records: Arc<dyn RecordStorage<K::Record>>,
    activities: Arc<dyn ActivityStorage>,
    cache: Arc<dyn LocalCache>,
    identity: IdentityResolver,
    cache_lock: Arc<Mutex<()>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: RecordKind> Clone for RecordRepository<K> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            activities: self.activities.clone(),
            cache: self.cache.clone(),
            identity: self.identity.clone(),
            cache_lock: self.cache_lock.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: RecordKind> RecordRepository<K> {
    pub fn new(
        records: Arc<dyn RecordStorage<K::Record>>,
        activities: Arc<dyn ActivityStorage>,
        cache: Arc<dyn LocalCache>,
        identity: IdentityResolver,
    ) -> Self {
        Self {
            records,
            activities,
            cache,
            identity,
            cache_lock: Arc::new(Mutex::new(())),
            _kind: PhantomData,
        }
    }

    /// The active user's record, from the primary store or else the local cache
    pub async fn get(&self) -> Option<K::Record> {
        let user = self.identity.resolve_user_id().await;

        match self.records.find_record(user.as_str()).await {
            Ok(Some(record)) => return Some(record),
            Ok(None) => debug!("No {} stored for {}, checking local cache", K::LABEL, user),
            Err(e) => warn!("Failed to load {} from primary store, using local cache: {}", K::LABEL, e),
        }

        self.cached_record()
    }

    /// Create or update the active user's record
    ///
    /// Returns the record as stored remotely, or `data` itself when it could
    /// only be kept in the local cache.
    pub async fn save(&self, data: &K::Record) -> K::Record {
        let user = self.identity.resolve_user_id().await;

        let existing_id = match self.records.find_record_id(user.as_str()).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Failed to look up existing {}, treating as new: {}", K::LABEL, e);
                None
            }
        };

        let result = match &existing_id {
            Some(record_id) => self.records.update_record(record_id, data, Utc::now()).await,
            None => self.records.insert_record(user.as_str(), data).await,
        };

        match result {
            Ok(stored) => {
                info!(
                    "{} {} for {}",
                    if existing_id.is_some() { "Updated" } else { "Created" },
                    K::LABEL,
                    user
                );
                stored
            }
            Err(e) => {
                warn!("Failed to save {} to primary store, keeping local copy: {}", K::LABEL, e);
                if let Err(e) = write_json(self.cache.as_ref(), K::RECORD_KEY, data) {
                    error!("Failed to cache {}: {}", K::LABEL, e);
                }
                data.clone()
            }
        }
    }

    /// Append an activity for the active user; the event is never dropped
    pub async fn log_activity(&self, activity: ActivityType, duration_minutes: Option<u32>) {
        let user = self.identity.resolve_user_id().await;

        let parent_id = match self.records.find_record_id(user.as_str()).await {
            Ok(id) => id,
            Err(e) => {
                debug!("Logging {} without a parent {}: {}", activity, K::LABEL, e);
                None
            }
        };

        let logged_at = Utc::now();
        let row = ActivityRecord::new(user.as_str(), parent_id, activity, duration_minutes, logged_at);

        match self.activities.insert_activity(&row).await {
            Ok(()) => info!("Logged {} for {} {}", activity, K::LABEL, user),
            Err(e) => {
                warn!("Failed to log {} to primary store, caching locally: {}", activity, e);
                let _guard = self.cache_lock.lock().await;
                let mut cached = self.cached_activities();
                cached.push(CachedActivity {
                    activity,
                    date: logged_at,
                    duration: duration_minutes,
                });
                if let Err(e) = write_json(self.cache.as_ref(), K::ACTIVITY_KEY, &cached) {
                    error!("Failed to cache {} activity: {}", K::LABEL, e);
                }
            }
        }
    }

    /// Consecutive days with at least one reading, ending today or yesterday
    pub async fn streak(&self) -> u32 {
        let user = self.identity.resolve_user_id().await;

        let timestamps = match self
            .activities
            .list_activity_times(user.as_str(), ActivityType::Reading)
            .await
        {
            Ok(timestamps) => timestamps,
            Err(e) => {
                warn!("Failed to load {} readings, using local cache: {}", K::LABEL, e);
                self.cached_activities()
                    .into_iter()
                    .filter(|entry| entry.activity == ActivityType::Reading)
                    .map(|entry| entry.date)
                    .collect()
            }
        };

        compute_streak_local(&timestamps)
    }

    /// Whether the active user logged `activity` during the current local day
    pub async fn has_activity_today(&self, activity: ActivityType) -> bool {
        let user = self.identity.resolve_user_id().await;
        let now = Local::now();

        match self
            .activities
            .has_activity_since(user.as_str(), activity, start_of_day(&now))
            .await
        {
            Ok(found) => found,
            Err(e) => {
                warn!("Failed to check today's {}, using local cache: {}", activity, e);
                self.cached_activities()
                    .iter()
                    .any(|entry| entry.activity == activity && same_calendar_day(&entry.date, &now))
            }
        }
    }

    /// Remove the active user's record, its activities and every local copy
    pub async fn delete(&self) {
        let user = self.identity.resolve_user_id().await;

        match self.records.delete_records(user.as_str()).await {
            Ok(count) => info!("Deleted {} {} record(s) for {}", count, K::LABEL, user),
            Err(e) => warn!("Failed to delete {} from primary store: {}", K::LABEL, e),
        }
        match self.activities.delete_activities(user.as_str()).await {
            Ok(count) => info!("Deleted {} {} activities for {}", count, K::LABEL, user),
            Err(e) => warn!("Failed to delete {} activities from primary store: {}", K::LABEL, e),
        }

        let _guard = self.cache_lock.lock().await;
        for key in [K::RECORD_KEY, K::ACTIVITY_KEY, K::DRAFT_KEY] {
            if let Err(e) = self.cache.remove(key) {
                error!("Failed to clear cache entry {}: {}", key, e);
            }
        }
    }

    /// In-progress wizard answers, empty when the wizard has not been started
    pub fn step_data(&self) -> K::Record {
        match read_json(self.cache.as_ref(), K::DRAFT_KEY) {
            Ok(draft) => draft.unwrap_or_default(),
            Err(e) => {
                warn!("Discarding unreadable {} draft: {}", K::LABEL, e);
                K::Record::default()
            }
        }
    }

    pub fn save_step_data(&self, data: &K::Record) -> Result<()> {
        write_json(self.cache.as_ref(), K::DRAFT_KEY, data)
    }

    pub fn clear_step_data(&self) -> Result<()> {
        self.cache.remove(K::DRAFT_KEY)
    }

    fn cached_record(&self) -> Option<K::Record> {
        match read_json(self.cache.as_ref(), K::RECORD_KEY) {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to read cached {}: {}", K::LABEL, e);
                None
            }
        }
    }

    fn cached_activities(&self) -> Vec<CachedActivity> {
        match read_json(self.cache.as_ref(), K::ACTIVITY_KEY) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to read cached {} activities: {}", K::LABEL, e);
                Vec::new()
            }
        }
    }
}

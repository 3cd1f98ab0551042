//! # In-Memory Primary Store
//!
//! Process-local implementation of the primary store ports. It backs
//! ephemeral runs (`primary_store: memory` in the config) and lets tests
//! exercise the fallback policy: every store shares a [`Connectivity`]
//! switch, and while it is off every call fails the way an unreachable
//! remote service would.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::ActivityType;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::models::{ActivityRecord, OwnedRecord};
use crate::storage::{ActivityStorage, RecordStorage};

/// Shared on/off switch simulating reachability of the primary store
#[derive(Clone, Default)]
pub struct Connectivity {
    offline: Arc<AtomicBool>,
}

impl Connectivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_online(&self, online: bool) {
        self.offline.store(!online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if !self.is_online() {
            bail!("primary store is unreachable");
        }
        Ok(())
    }
}

#[derive(Clone)]
struct OwnedRow<R> {
    owner_id: String,
    record: R,
}

/// In-memory record collection, unique per owner
#[derive(Clone)]
pub struct MemoryRecordStore<R> {
    rows: Arc<RwLock<Vec<OwnedRow<R>>>>,
    connectivity: Connectivity,
}

impl<R: OwnedRecord> MemoryRecordStore<R> {
    pub fn new(connectivity: Connectivity) -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            connectivity,
        }
    }

    /// Owners of all stored records, regardless of connectivity
    #[cfg(test)]
    pub async fn owners(&self) -> Vec<String> {
        self.rows.read().await.iter().map(|row| row.owner_id.clone()).collect()
    }
}

#[async_trait]
impl<R: OwnedRecord> RecordStorage<R> for MemoryRecordStore<R> {
    async fn find_record(&self, owner_id: &str) -> Result<Option<R>> {
        self.connectivity.check()?;
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|row| row.owner_id == owner_id)
            .map(|row| row.record.clone()))
    }

    async fn find_record_id(&self, owner_id: &str) -> Result<Option<String>> {
        Ok(self
            .find_record(owner_id)
            .await?
            .and_then(|record| record.record_id().map(str::to_string)))
    }

    async fn insert_record(&self, owner_id: &str, record: &R) -> Result<R> {
        self.connectivity.check()?;
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.owner_id == owner_id) {
            bail!("a record already exists for owner {}", owner_id);
        }

        let stored = record.stamped(uuid::Uuid::new_v4().to_string(), Utc::now());
        rows.push(OwnedRow {
            owner_id: owner_id.to_string(),
            record: stored.clone(),
        });
        Ok(stored)
    }

    async fn update_record(&self, record_id: &str, record: &R, _updated_at: DateTime<Utc>) -> Result<R> {
        self.connectivity.check()?;
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|row| row.record.record_id() == Some(record_id)) {
            Some(row) => {
                row.record = R::merged(&row.record, record);
                Ok(row.record.clone())
            }
            None => bail!("record {} not found", record_id),
        }
    }

    async fn delete_records(&self, owner_id: &str) -> Result<u64> {
        self.connectivity.check()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.owner_id != owner_id);
        Ok((before - rows.len()) as u64)
    }

    async fn reassign_records(&self, from_owner: &str, to_owner: &str) -> Result<u64> {
        self.connectivity.check()?;
        let mut rows = self.rows.write().await;
        let moving = rows.iter().filter(|row| row.owner_id == from_owner).count();
        if moving > 0 && rows.iter().any(|row| row.owner_id == to_owner) {
            bail!("owner {} already has a record", to_owner);
        }

        for row in rows.iter_mut().filter(|row| row.owner_id == from_owner) {
            row.owner_id = to_owner.to_string();
        }
        Ok(moving as u64)
    }
}

/// In-memory append-only activity log
#[derive(Clone)]
pub struct MemoryActivityLog {
    rows: Arc<RwLock<Vec<ActivityRecord>>>,
    connectivity: Connectivity,
}

impl MemoryActivityLog {
    pub fn new(connectivity: Connectivity) -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            connectivity,
        }
    }

    /// Every stored row, regardless of connectivity
    #[cfg(test)]
    pub async fn rows(&self) -> Vec<ActivityRecord> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl ActivityStorage for MemoryActivityLog {
    async fn insert_activity(&self, activity: &ActivityRecord) -> Result<()> {
        self.connectivity.check()?;
        self.rows.write().await.push(activity.clone());
        Ok(())
    }

    async fn list_activity_times(&self, owner_id: &str, activity: ActivityType) -> Result<Vec<DateTime<Utc>>> {
        self.connectivity.check()?;
        let rows = self.rows.read().await;
        let mut times: Vec<DateTime<Utc>> = rows
            .iter()
            .filter(|row| row.owner_id == owner_id && row.activity == activity)
            .map(|row| row.logged_at)
            .collect();
        times.sort_by(|a, b| b.cmp(a));
        Ok(times)
    }

    async fn has_activity_since(&self, owner_id: &str, activity: ActivityType, since: DateTime<Utc>) -> Result<bool> {
        self.connectivity.check()?;
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .any(|row| row.owner_id == owner_id && row.activity == activity && row.logged_at >= since))
    }

    async fn delete_activities(&self, owner_id: &str) -> Result<u64> {
        self.connectivity.check()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.owner_id != owner_id);
        Ok((before - rows.len()) as u64)
    }

    async fn reassign_activities(&self, from_owner: &str, to_owner: &str) -> Result<u64> {
        self.connectivity.check()?;
        let mut rows = self.rows.write().await;
        let mut moved = 0;
        for row in rows.iter_mut().filter(|row| row.owner_id == from_owner) {
            row.owner_id = to_owner.to_string();
            moved += 1;
        }
        Ok(moved)
    }
}

//! Moving anonymous device data to an account on sign-in.

use shared::{AffirmationData, MigrationStatus, PledgeData};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::identity::IdentityResolver;
use crate::storage::{ActivityStorage, RecordStorage};

/// Reassigns every primary-store row owned by the device id to an account
///
/// An account that already owns an affirmation is treated as having data of
/// its own; device data is then left untouched. Each collection is moved
/// independently and failures are logged, never returned, so a partial
/// migration is possible.
#[derive(Clone)]
pub struct MigrationService {
    affirmations: Arc<dyn RecordStorage<AffirmationData>>,
    reading_log: Arc<dyn ActivityStorage>,
    pledges: Arc<dyn RecordStorage<PledgeData>>,
    confidence_log: Arc<dyn ActivityStorage>,
    identity: IdentityResolver,
}

impl MigrationService {
    pub fn new(
        affirmations: Arc<dyn RecordStorage<AffirmationData>>,
        reading_log: Arc<dyn ActivityStorage>,
        pledges: Arc<dyn RecordStorage<PledgeData>>,
        confidence_log: Arc<dyn ActivityStorage>,
        identity: IdentityResolver,
    ) -> Self {
        Self {
            affirmations,
            reading_log,
            pledges,
            confidence_log,
            identity,
        }
    }

    pub async fn migrate_on_sign_in(&self, account_id: &str) -> MigrationStatus {
        let device_id = match self.identity.stored_device_id() {
            Some(id) => id,
            None => {
                info!("No device id on this device, nothing to migrate");
                return MigrationStatus::NothingToMigrate;
            }
        };

        match self.affirmations.find_record_id(account_id).await {
            Ok(Some(_)) => {
                info!("Account {} already has data, keeping device {} data in place", account_id, device_id);
                return MigrationStatus::AccountHasData;
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to check account {} for existing data, migrating anyway: {}", account_id, e),
        }

        let mut rows_moved = 0;
        rows_moved += Self::report("affirmations", self.affirmations.reassign_records(&device_id, account_id).await);
        rows_moved += Self::report("reading log", self.reading_log.reassign_activities(&device_id, account_id).await);
        rows_moved += Self::report("pledges", self.pledges.reassign_records(&device_id, account_id).await);
        rows_moved += Self::report(
            "confidence log",
            self.confidence_log.reassign_activities(&device_id, account_id).await,
        );

        info!("Migrated {} rows from device {} to account {}", rows_moved, device_id, account_id);
        MigrationStatus::Migrated { rows_moved }
    }

    fn report(collection: &str, result: anyhow::Result<u64>) -> u64 {
        match result {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to migrate {}: {}", collection, e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ActivityRecord;
    use crate::domain::session::SessionState;
    use crate::storage::{CacheKey, Connectivity, LocalCache, MemoryActivityLog, MemoryCache, MemoryRecordStore};
    use chrono::Utc;
    use shared::ActivityType;

    struct Fixture {
        service: MigrationService,
        affirmations: MemoryRecordStore<AffirmationData>,
        reading_log: MemoryActivityLog,
        pledges: MemoryRecordStore<PledgeData>,
        confidence_log: MemoryActivityLog,
        identity: IdentityResolver,
        cache: MemoryCache,
        connectivity: Connectivity,
    }

    fn fixture() -> Fixture {
        let connectivity = Connectivity::new();
        let affirmations = MemoryRecordStore::new(connectivity.clone());
        let reading_log = MemoryActivityLog::new(connectivity.clone());
        let pledges = MemoryRecordStore::new(connectivity.clone());
        let confidence_log = MemoryActivityLog::new(connectivity.clone());
        let cache = MemoryCache::new();
        let identity = IdentityResolver::new(Arc::new(SessionState::new()), Arc::new(cache.clone()));
        let service = MigrationService::new(
            Arc::new(affirmations.clone()),
            Arc::new(reading_log.clone()),
            Arc::new(pledges.clone()),
            Arc::new(confidence_log.clone()),
            identity.clone(),
        );
        Fixture {
            service,
            affirmations,
            reading_log,
            pledges,
            confidence_log,
            identity,
            cache,
            connectivity,
        }
    }

    async fn seed_device_data(f: &Fixture) -> String {
        let device = f.identity.resolve_user_id().await.as_str().to_string();
        f.affirmations.insert_record(&device, &AffirmationData::default()).await.unwrap();
        f.pledges.insert_record(&device, &PledgeData::default()).await.unwrap();
        for log in [&f.reading_log, &f.confidence_log] {
            let row = ActivityRecord::new(&device, None, ActivityType::Reading, None, Utc::now());
            log.insert_activity(&row).await.unwrap();
        }
        device
    }

    #[tokio::test]
    async fn test_nothing_to_migrate_without_device_id() {
        let f = fixture();
        assert_eq!(f.service.migrate_on_sign_in("account").await, MigrationStatus::NothingToMigrate);
        assert!(f.cache.get_raw(CacheKey::DeviceId).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_moves_all_four_collections() {
        let f = fixture();
        seed_device_data(&f).await;

        let status = f.service.migrate_on_sign_in("account").await;
        assert_eq!(status, MigrationStatus::Migrated { rows_moved: 4 });

        assert_eq!(f.affirmations.owners().await, vec!["account"]);
        assert_eq!(f.pledges.owners().await, vec!["account"]);
        assert!(f.reading_log.rows().await.iter().all(|row| row.owner_id == "account"));
        assert!(f.confidence_log.rows().await.iter().all(|row| row.owner_id == "account"));
    }

    #[tokio::test]
    async fn test_existing_account_data_is_left_alone() {
        let f = fixture();
        let device = seed_device_data(&f).await;
        f.affirmations.insert_record("account", &AffirmationData::default()).await.unwrap();

        let status = f.service.migrate_on_sign_in("account").await;
        assert_eq!(status, MigrationStatus::AccountHasData);

        let owners = f.affirmations.owners().await;
        assert!(owners.contains(&device));
        assert_eq!(f.pledges.owners().await, vec![device.clone()]);
        assert!(f.reading_log.rows().await.iter().all(|row| row.owner_id == device));
        assert!(f.confidence_log.rows().await.iter().all(|row| row.owner_id == device));
    }

    #[tokio::test]
    async fn test_account_pledge_blocks_only_the_pledge_move() {
        let f = fixture();
        let device = seed_device_data(&f).await;
        f.pledges.insert_record("account", &PledgeData::default()).await.unwrap();

        // Steps are independent: the pledge stays with the device while its log moves
        let status = f.service.migrate_on_sign_in("account").await;
        assert_eq!(status, MigrationStatus::Migrated { rows_moved: 3 });

        assert_eq!(f.affirmations.owners().await, vec!["account"]);
        let mut pledge_owners = f.pledges.owners().await;
        pledge_owners.sort();
        let mut expected = vec!["account".to_string(), device];
        expected.sort();
        assert_eq!(pledge_owners, expected);
        assert!(f.reading_log.rows().await.iter().all(|row| row.owner_id == "account"));
        assert!(f.confidence_log.rows().await.iter().all(|row| row.owner_id == "account"));
    }

    #[tokio::test]
    async fn test_device_without_rows_migrates_nothing() {
        let f = fixture();
        f.identity.resolve_user_id().await;

        let status = f.service.migrate_on_sign_in("account").await;
        assert_eq!(status, MigrationStatus::Migrated { rows_moved: 0 });
    }

    #[tokio::test]
    async fn test_unreachable_store_is_not_an_error() {
        let f = fixture();
        seed_device_data(&f).await;
        f.connectivity.set_online(false);

        let status = f.service.migrate_on_sign_in("account").await;
        assert_eq!(status, MigrationStatus::Migrated { rows_moved: 0 });

        f.connectivity.set_online(true);
        assert!(!f.affirmations.owners().await.contains(&"account".to_string()));
    }
}

//! Sign-in orchestration.
//!
//! Signing in records the account as the active session and, on a real
//! transition, migrates device-owned data to it. Signing out only clears the
//! session; the device id stays in the local cache so anonymous use resumes
//! with the same identity.

use shared::{MigrationStatus, SessionResponse, SignInResponse};
use tracing::info;

use crate::domain::identity::{IdentityResolver, UserIdentity};
use crate::domain::migration::MigrationService;
use crate::domain::session::SessionState;

#[derive(Clone)]
pub struct AccountService {
    session: SessionState,
    identity: IdentityResolver,
    migration: MigrationService,
}

impl AccountService {
    pub fn new(session: SessionState, identity: IdentityResolver, migration: MigrationService) -> Self {
        Self {
            session,
            identity,
            migration,
        }
    }

    pub async fn sign_in(&self, account_id: &str) -> SignInResponse {
        let migration = if self.session.sign_in(account_id).await {
            info!("Account {} signed in", account_id);
            self.migration.migrate_on_sign_in(account_id).await
        } else {
            MigrationStatus::AlreadySignedIn
        };

        SignInResponse {
            user_id: account_id.to_string(),
            migration,
        }
    }

    pub async fn sign_out(&self) -> SessionResponse {
        if let Some(account_id) = self.session.sign_out().await {
            info!("Account {} signed out", account_id);
        }
        self.current_identity().await
    }

    pub async fn current_identity(&self) -> SessionResponse {
        let identity = self.identity.resolve_user_id().await;
        SessionResponse {
            authenticated: identity.is_authenticated(),
            user_id: match identity {
                UserIdentity::Account(id) | UserIdentity::Device(id) => id,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ActivityStorage, Connectivity, MemoryActivityLog, MemoryCache, MemoryRecordStore, RecordStorage};
    use shared::{AffirmationData, PledgeData};
    use std::sync::Arc;

    fn service() -> (AccountService, MemoryRecordStore<AffirmationData>) {
        let connectivity = Connectivity::new();
        let affirmations = MemoryRecordStore::<AffirmationData>::new(connectivity.clone());
        let session = SessionState::new();
        let identity = IdentityResolver::new(Arc::new(session.clone()), Arc::new(MemoryCache::new()));
        let reading_log: Arc<dyn ActivityStorage> = Arc::new(MemoryActivityLog::new(connectivity.clone()));
        let pledges: Arc<dyn RecordStorage<PledgeData>> = Arc::new(MemoryRecordStore::new(connectivity.clone()));
        let migration = MigrationService::new(
            Arc::new(affirmations.clone()),
            reading_log.clone(),
            pledges,
            Arc::new(MemoryActivityLog::new(connectivity)),
            identity.clone(),
        );
        (AccountService::new(session, identity, migration), affirmations)
    }

    #[tokio::test]
    async fn test_sign_in_migrates_once() {
        let (service, affirmations) = service();
        let device = service.current_identity().await;
        assert!(!device.authenticated);
        affirmations
            .insert_record(&device.user_id, &AffirmationData::default())
            .await
            .unwrap();

        let first = service.sign_in("account-1").await;
        assert_eq!(first.user_id, "account-1");
        assert_eq!(first.migration, MigrationStatus::Migrated { rows_moved: 1 });

        let second = service.sign_in("account-1").await;
        assert_eq!(second.migration, MigrationStatus::AlreadySignedIn);
        assert_eq!(affirmations.owners().await, vec!["account-1"]);
    }

    #[tokio::test]
    async fn test_sign_out_returns_to_device() {
        let (service, _affirmations) = service();
        let device = service.current_identity().await;

        service.sign_in("account-1").await;
        let signed_in = service.current_identity().await;
        assert!(signed_in.authenticated);
        assert_eq!(signed_in.user_id, "account-1");

        let signed_out = service.sign_out().await;
        assert_eq!(signed_out, device);
    }
}

//! # Rikedom Backend
//!
//! Persistence and sync service behind the Rikedom PWA, a personal
//! development app with two programs: a wealth affirmation read twice a day
//! and a self-confidence pledge with timed visualization sessions.
//!
//! ## Architecture
//!
//! - **domain**: identity, streaks, the two-tier persistence facade, migration
//! - **storage**: primary store (SQLite or in-memory) and local JSON cache
//! - **io**: REST API built with Axum
//! - **config**: YAML configuration
//!
//! ## Responsibilities
//!
//! - Wire the storage tiers and domain services into [`AppState`]
//! - Build the Axum router with CORS and an optional static frontend

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use shared::{AffirmationData, PledgeData};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::{AppConfig, PrimaryStoreConfig};
use crate::domain::models::{Affirmation, Pledge};
use crate::domain::{
    AccountService, IdentityResolver, MigrationService, RecordRepository, SessionState, SettingsService,
};
use crate::storage::{
    ActivityStorage, Connectivity, DbConnection, FileCache, LocalCache, MemoryActivityLog, MemoryRecordStore,
    RecordStorage, SqliteActivityLog, SqliteAffirmationRepository, SqlitePledgeRepository,
};

/// The four collections of the primary store
#[derive(Clone)]
pub struct PrimaryStore {
    pub affirmations: Arc<dyn RecordStorage<AffirmationData>>,
    pub reading_log: Arc<dyn ActivityStorage>,
    pub pledges: Arc<dyn RecordStorage<PledgeData>>,
    pub confidence_log: Arc<dyn ActivityStorage>,
}

impl PrimaryStore {
    pub fn sqlite(db: DbConnection) -> Self {
        Self {
            affirmations: Arc::new(SqliteAffirmationRepository::new(db.clone())),
            reading_log: Arc::new(SqliteActivityLog::reading_log(db.clone())),
            pledges: Arc::new(SqlitePledgeRepository::new(db.clone())),
            confidence_log: Arc::new(SqliteActivityLog::confidence_log(db)),
        }
    }

    pub fn memory(connectivity: Connectivity) -> Self {
        Self {
            affirmations: Arc::new(MemoryRecordStore::<AffirmationData>::new(connectivity.clone())),
            reading_log: Arc::new(MemoryActivityLog::new(connectivity.clone())),
            pledges: Arc::new(MemoryRecordStore::<PledgeData>::new(connectivity.clone())),
            confidence_log: Arc::new(MemoryActivityLog::new(connectivity)),
        }
    }
}

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub affirmation_repository: RecordRepository<Affirmation>,
    pub pledge_repository: RecordRepository<Pledge>,
    pub account_service: AccountService,
    pub settings_service: SettingsService,
}

impl AppState {
    pub fn new(primary: PrimaryStore, cache: Arc<dyn LocalCache>) -> Self {
        let session = SessionState::new();
        let identity = IdentityResolver::new(Arc::new(session.clone()), cache.clone());

        let affirmation_repository = RecordRepository::new(
            primary.affirmations.clone(),
            primary.reading_log.clone(),
            cache.clone(),
            identity.clone(),
        );
        let pledge_repository = RecordRepository::new(
            primary.pledges.clone(),
            primary.confidence_log.clone(),
            cache.clone(),
            identity.clone(),
        );
        let migration = MigrationService::new(
            primary.affirmations,
            primary.reading_log,
            primary.pledges,
            primary.confidence_log,
            identity.clone(),
        );

        Self {
            affirmation_repository,
            pledge_repository,
            account_service: AccountService::new(session, identity, migration),
            settings_service: SettingsService::new(cache),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up local cache in {:?}", config.data_directory);
    let cache = FileCache::new(&config.data_directory)
        .with_context(|| format!("Failed to open local cache in {:?}", config.data_directory))?;

    let primary = match config.primary_store() {
        PrimaryStoreConfig::Sqlite { url } => {
            info!("Setting up primary database {}", url);
            let db = DbConnection::new(&url)
                .await
                .with_context(|| format!("Failed to open primary database {}", url))?;
            PrimaryStore::sqlite(db)
        }
        PrimaryStoreConfig::Memory => {
            info!("Using in-memory primary store; data is lost on exit");
            PrimaryStore::memory(Connectivity::new())
        }
    };

    info!("Setting up application state");
    Ok(AppState::new(primary, Arc::new(cache)))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid allowed origin {}", config.allowed_origin))?;

    // CORS setup to allow the frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let mut router = Router::new().nest("/api", io::rest::api_routes());
    if let Some(static_directory) = &config.static_directory {
        info!("Serving frontend from {:?}", static_directory);
        router = router.fallback_service(ServeDir::new(static_directory));
    }

    Ok(router.layer(cors).with_state(app_state))
}

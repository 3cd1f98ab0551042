//! # SQLite Storage Module
//!
//! Primary store backed by SQLite through `sqlx`.
//!
//! ## Components
//!
//! - **connection.rs** - Pool management and schema setup
//! - **affirmation_repository.rs** - `affirmations` table
//! - **pledge_repository.rs** - `self_confidence_pledges` table
//! - **activity_log.rs** - `reading_log` and `self_confidence_log` tables

pub mod activity_log;
pub mod affirmation_repository;
pub mod connection;
pub mod pledge_repository;

pub use activity_log::ActivityLogRepository as SqliteActivityLog;
pub use affirmation_repository::AffirmationRepository as SqliteAffirmationRepository;
pub use connection::DbConnection;
pub use pledge_repository::PledgeRepository as SqlitePledgeRepository;

//! # Storage Module
//!
//! Handles all data persistence for the backend.
//!
//! Data lives in two tiers:
//!
//! - **Primary store**: the shared relational store that owns records and
//!   activity logs per user identity. Implemented over SQL with SQLx
//!   ([`sqlite`]) and in memory ([`memory`]).
//! - **Local cache**: device-local JSON values ([`local`]) used for the device
//!   identifier, wizard drafts, notification preferences, and as a fallback
//!   copy whenever the primary store fails.
//!
//! The domain layer only sees the traits in [`traits`], so either tier can be
//! replaced without touching domain logic.

pub mod local;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use local::{CacheKey, FileCache, MemoryCache};
pub use memory::{Connectivity, MemoryActivityLog, MemoryRecordStore};
pub use sqlite::{DbConnection, SqliteActivityLog, SqliteAffirmationRepository, SqlitePledgeRepository};
pub use traits::{ActivityStorage, LocalCache, RecordStorage};

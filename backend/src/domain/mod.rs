//! # Domain Module
//!
//! Business logic of the Rikedom programs: the wealth affirmation and the
//! self-confidence pledge.
//!
//! ## Module Organization
//!
//! - **identity**: Resolution of the active user (account or device)
//! - **session**: In-process record of the signed-in account
//! - **repository**: Remote-first persistence facade with local cache fallback
//! - **streak**: Consecutive-day reading streaks
//! - **migration**: Moving device data to an account on sign-in
//! - **account_service**: Sign-in and sign-out orchestration
//! - **settings_service**: Notification preferences
//! - **statement**: Swedish affirmation and pledge texts
//! - **wizard**: Step catalogs of the two creation wizards
//! - **validation**: Input checks applied at the API boundary
//!
//! ## Core Concepts
//!
//! - **Record**: The single affirmation or pledge a user owns
//! - **Activity**: An append-only event (reading, visualization, mental training)
//! - **Device identity**: Random id used until the user signs in
//! - **Streak**: Days in a row, ending today or yesterday, with a reading
//!
//! ## Business Rules
//!
//! - A user owns at most one record per program
//! - Reads and writes never fail; an unreachable primary store degrades to the local cache
//! - Device data moves to an account only when the account has no affirmation yet

pub mod account_service;
pub mod identity;
pub mod migration;
pub mod models;
pub mod repository;
pub mod session;
pub mod settings_service;
pub mod statement;
pub mod streak;
pub mod validation;
pub mod wizard;

pub use account_service::AccountService;
pub use identity::{IdentityResolver, UserIdentity};
pub use migration::MigrationService;
pub use repository::RecordRepository;
pub use session::{SessionProvider, SessionState};
pub use settings_service::{SettingsError, SettingsService};
pub use validation::ValidationError;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};
use shared::{AffirmationData, PledgeData};
use std::fmt::Debug;

use crate::domain::statement::{generate_full_pledge, generate_statement};
use crate::domain::validation::{validate_affirmation, validate_pledge, ValidationError};
use crate::domain::wizard::{WizardStep, AFFIRMATION_STEPS, PLEDGE_STEPS};
use crate::storage::CacheKey;

/// A record that exists at most once per user identity
pub trait OwnedRecord:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Primary store id, if the record has been stored there
    fn record_id(&self) -> Option<&str>;

    /// Copy of this record carrying the id and timestamps of a fresh insert
    fn stamped(&self, id: String, created_at: DateTime<Utc>) -> Self;

    /// Copy of `current` with every mutable field taken from `changes`
    fn merged(current: &Self, changes: &Self) -> Self;
}

impl OwnedRecord for AffirmationData {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn stamped(&self, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Some(id),
            created_at: Some(created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ..self.clone()
        }
    }

    fn merged(current: &Self, changes: &Self) -> Self {
        Self {
            id: current.id.clone(),
            created_at: current.created_at.clone(),
            ..changes.clone()
        }
    }
}

impl OwnedRecord for PledgeData {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn stamped(&self, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Some(id),
            signed_at: Some(created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ..self.clone()
        }
    }

    fn merged(current: &Self, changes: &Self) -> Self {
        Self {
            id: current.id.clone(),
            signed_at: current.signed_at.clone(),
            ..changes.clone()
        }
    }
}

/// One of the two programs: its record shape, cache keys and wizard
pub trait RecordKind: Send + Sync + 'static {
    type Record: OwnedRecord;

    /// Name used in logs and routes
    const LABEL: &'static str;
    /// Cache key holding the fallback record snapshot
    const RECORD_KEY: CacheKey;
    /// Cache key holding the fallback activity list
    const ACTIVITY_KEY: CacheKey;
    /// Cache key holding in-progress wizard answers
    const DRAFT_KEY: CacheKey;

    fn steps() -> &'static [WizardStep];

    fn validate(record: &Self::Record) -> Result<(), ValidationError>;

    /// Full text the user reads every day
    fn generate_text(record: &Self::Record) -> String;
}

/// The wealth affirmation program
pub struct Affirmation;

impl RecordKind for Affirmation {
    type Record = AffirmationData;

    const LABEL: &'static str = "affirmation";
    const RECORD_KEY: CacheKey = CacheKey::Affirmation;
    const ACTIVITY_KEY: CacheKey = CacheKey::ReadingLog;
    const DRAFT_KEY: CacheKey = CacheKey::AffirmationSteps;

    fn steps() -> &'static [WizardStep] {
        AFFIRMATION_STEPS
    }

    fn validate(record: &AffirmationData) -> Result<(), ValidationError> {
        validate_affirmation(record)
    }

    fn generate_text(record: &AffirmationData) -> String {
        generate_statement(record)
    }
}

/// The self-confidence pledge program
pub struct Pledge;

impl RecordKind for Pledge {
    type Record = PledgeData;

    const LABEL: &'static str = "pledge";
    const RECORD_KEY: CacheKey = CacheKey::Pledge;
    const ACTIVITY_KEY: CacheKey = CacheKey::ConfidenceLog;
    const DRAFT_KEY: CacheKey = CacheKey::PledgeSteps;

    fn steps() -> &'static [WizardStep] {
        PLEDGE_STEPS
    }

    fn validate(record: &PledgeData) -> Result<(), ValidationError> {
        validate_pledge(record)
    }

    fn generate_text(record: &PledgeData) -> String {
        generate_full_pledge(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_merge_keeps_identity_of_current() {
        let current = AffirmationData {
            id: Some("aff-1".to_string()),
            amount: "1000".to_string(),
            created_at: Some("2026-01-01T00:00:00.000Z".to_string()),
            ..Default::default()
        };
        let changes = AffirmationData {
            id: None,
            amount: "2000".to_string(),
            plan: "Work".to_string(),
            ..Default::default()
        };

        let merged = AffirmationData::merged(&current, &changes);
        assert_eq!(merged.id.as_deref(), Some("aff-1"));
        assert_eq!(merged.created_at, current.created_at);
        assert_eq!(merged.amount, "2000");
        assert_eq!(merged.plan, "Work");
    }

    #[test]
    fn test_pledge_stamp_sets_signed_at() {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 8, 30, 0).unwrap();
        let pledge = PledgeData {
            principle_1: "Strength".to_string(),
            ..Default::default()
        }
        .stamped("pl-1".to_string(), at);

        assert_eq!(pledge.record_id(), Some("pl-1"));
        assert_eq!(pledge.signed_at.as_deref(), Some("2026-05-01T08:30:00.000Z"));
        assert_eq!(pledge.principle_1, "Strength");
    }

    #[test]
    fn test_kinds_use_separate_cache_keys() {
        assert_ne!(Affirmation::RECORD_KEY, Pledge::RECORD_KEY);
        assert_ne!(Affirmation::ACTIVITY_KEY, Pledge::ACTIVITY_KEY);
        assert_ne!(Affirmation::DRAFT_KEY, Pledge::DRAFT_KEY);
        assert_eq!(Affirmation::steps().len(), 5);
        assert_eq!(Pledge::steps().len(), 5);
    }
}

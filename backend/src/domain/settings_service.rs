use anyhow::Result;
use shared::NotificationSettings;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::validation::{validate_notification_settings, ValidationError};
use crate::storage::local::{read_json, write_json};
use crate::storage::{CacheKey, LocalCache};

/// Error returned when saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Failed to store settings: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Device-local notification preferences
#[derive(Clone)]
pub struct SettingsService {
    cache: Arc<dyn LocalCache>,
}

impl SettingsService {
    pub fn new(cache: Arc<dyn LocalCache>) -> Self {
        Self { cache }
    }

    /// Stored preferences, or the defaults when none are stored or readable
    pub fn notification_settings(&self) -> NotificationSettings {
        match read_json(self.cache.as_ref(), CacheKey::NotificationSettings) {
            Ok(Some(settings)) => settings,
            Ok(None) => NotificationSettings::default(),
            Err(e) => {
                warn!("Failed to read notification settings, using defaults: {}", e);
                NotificationSettings::default()
            }
        }
    }

    pub fn save_notification_settings(&self, settings: &NotificationSettings) -> Result<(), SettingsError> {
        validate_notification_settings(settings)?;
        self.store(settings)?;
        info!(
            "Saved notification settings (morning {} {}, evening {} {})",
            settings.morning_enabled, settings.morning_time, settings.evening_enabled, settings.evening_time
        );
        Ok(())
    }

    fn store(&self, settings: &NotificationSettings) -> Result<()> {
        write_json(self.cache.as_ref(), CacheKey::NotificationSettings, settings)
    }
}

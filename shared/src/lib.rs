use serde::{Deserialize, Serialize};
use std::fmt;

/// The wealth affirmation written during the five-step affirmation wizard.
///
/// Every field defaults so a partially filled wizard (or a partial JSON body)
/// deserializes into this same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffirmationData {
    /// Primary store id, absent until the record has been stored remotely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The exact amount of money desired, kept as the user typed it (e.g. "500000")
    #[serde(default)]
    pub amount: String,
    /// What the user gives in exchange for the money
    #[serde(default)]
    pub exchange: String,
    /// Deadline date (YYYY-MM-DD)
    #[serde(default)]
    pub deadline: String,
    /// The concrete plan
    #[serde(default)]
    pub plan: String,
    /// Generated statement the user reads every day
    #[serde(default)]
    pub statement: String,
    /// Creation timestamp (RFC 3339)
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// The self-confidence pledge signed at the end of the pledge wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PledgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub principle_1: String,
    #[serde(default)]
    pub principle_2: String,
    #[serde(default)]
    pub principle_3: String,
    #[serde(default)]
    pub principle_4: String,
    /// When the pledge was first signed (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<String>,
}

/// Kind of daily activity recorded in an activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Reading the affirmation or pledge aloud
    Reading,
    /// A completed visualization timer session
    Visualization,
    /// A completed mental training timer session
    MentalTraining,
}

impl ActivityType {
    /// Tag used in storage and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Reading => "reading",
            ActivityType::Visualization => "visualization",
            ActivityType::MentalTraining => "mental_training",
        }
    }

    /// Parse a storage tag back into an activity type
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "reading" => Some(ActivityType::Reading),
            "visualization" => Some(ActivityType::Visualization),
            "mental_training" => Some(ActivityType::MentalTraining),
            _ => None,
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daily reminder preferences, kept on the device only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub morning_enabled: bool,
    /// Local time of the morning reminder (HH:MM)
    pub morning_time: String,
    pub evening_enabled: bool,
    /// Local time of the evening reminder (HH:MM)
    pub evening_time: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            morning_enabled: true,
            morning_time: "07:00".to_string(),
            evening_enabled: true,
            evening_time: "22:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogActivityRequest {
    pub activity: ActivityType,
    /// Length of a timer session in minutes, absent for readings
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakResponse {
    /// Consecutive days (ending today or yesterday) with at least one reading
    pub streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTodayResponse {
    pub activity: ActivityType,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTextResponse {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInRequest {
    /// Account id issued by the auth provider
    pub account_id: String,
}

/// Result of moving device-owned data to a freshly signed-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationStatus {
    /// The same account was already signed in, no transition happened
    AlreadySignedIn,
    /// No device id was ever generated on this device
    NothingToMigrate,
    /// The account already owns data, device data was left in place
    AccountHasData,
    /// Device rows were reassigned to the account
    Migrated { rows_moved: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    /// The active logical user (account id or device id)
    pub user_id: String,
    pub authenticated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInResponse {
    pub user_id: String,
    pub migration: MigrationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

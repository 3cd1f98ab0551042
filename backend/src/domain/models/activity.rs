use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::ActivityType;

/// One row of an activity log in the primary store
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub id: String,
    /// Account id or device id owning the row
    pub owner_id: String,
    /// Affirmation or pledge the activity belongs to, when one was found
    pub parent_id: Option<String>,
    pub activity: ActivityType,
    pub duration_minutes: Option<u32>,
    pub logged_at: DateTime<Utc>,
}

impl ActivityRecord {
    pub fn new(
        owner_id: &str,
        parent_id: Option<String>,
        activity: ActivityType,
        duration_minutes: Option<u32>,
        logged_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            parent_id,
            activity,
            duration_minutes,
            logged_at,
        }
    }
}

/// Activity entry kept in the local cache when the primary store is unreachable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedActivity {
    #[serde(rename = "type")]
    pub activity: ActivityType,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_activity_reads_browser_format() {
        let raw = r#"[{"type":"reading","date":"2026-03-10T06:15:00.000Z"},
                      {"type":"visualization","date":"2026-03-10T19:00:00.000Z","duration":30}]"#;
        let entries: Vec<CachedActivity> = serde_json::from_str(raw).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].activity, ActivityType::Reading);
        assert_eq!(entries[0].duration, None);
        assert_eq!(entries[1].duration, Some(30));
    }

    #[test]
    fn test_new_activity_gets_unique_id() {
        let now = Utc::now();
        let a = ActivityRecord::new("owner", None, ActivityType::Reading, None, now);
        let b = ActivityRecord::new("owner", None, ActivityType::Reading, None, now);
        assert_ne!(a.id, b.id);
        assert_eq!(a.owner_id, "owner");
    }
}

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::ActivityType;
use sqlx::Row;

use crate::domain::models::ActivityRecord;
use crate::storage::sqlite::connection::{decode_timestamp, encode_timestamp, DbConnection};
use crate::storage::ActivityStorage;

/// SQLite activity log; one table per program
#[derive(Clone)]
pub struct ActivityLogRepository {
    db: DbConnection,
    table: &'static str,
    parent_column: &'static str,
}

impl ActivityLogRepository {
    /// Readings and timer sessions of the affirmation program
    pub fn reading_log(db: DbConnection) -> Self {
        Self {
            db,
            table: "reading_log",
            parent_column: "affirmation_id",
        }
    }

    /// Readings and timer sessions of the pledge program
    pub fn confidence_log(db: DbConnection) -> Self {
        Self {
            db,
            table: "self_confidence_log",
            parent_column: "pledge_id",
        }
    }
}

#[async_trait]
impl ActivityStorage for ActivityLogRepository {
    async fn insert_activity(&self, activity: &ActivityRecord) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (id, user_id, {}, activity_type, duration_minutes, logged_at) VALUES (?, ?, ?, ?, ?, ?)",
            self.table, self.parent_column
        );
        sqlx::query(&sql)
            .bind(&activity.id)
            .bind(&activity.owner_id)
            .bind(&activity.parent_id)
            .bind(activity.activity.as_str())
            .bind(activity.duration_minutes.map(i64::from))
            .bind(encode_timestamp(&activity.logged_at))
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn list_activity_times(&self, owner_id: &str, activity: ActivityType) -> Result<Vec<DateTime<Utc>>> {
        let sql = format!(
            "SELECT logged_at FROM {} WHERE user_id = ? AND activity_type = ? ORDER BY logged_at DESC",
            self.table
        );
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .bind(activity.as_str())
            .fetch_all(self.db.pool())
            .await?;

        rows.iter()
            .map(|row| decode_timestamp(row.get::<&str, _>("logged_at")))
            .collect()
    }

    async fn has_activity_since(&self, owner_id: &str, activity: ActivityType, since: DateTime<Utc>) -> Result<bool> {
        let sql = format!(
            "SELECT COUNT(*) AS count FROM {} WHERE user_id = ? AND activity_type = ? AND logged_at >= ?",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(owner_id)
            .bind(activity.as_str())
            .bind(encode_timestamp(&since))
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.get::<i64, _>("count") > 0)
    }

    async fn delete_activities(&self, owner_id: &str) -> Result<u64> {
        let sql = format!("DELETE FROM {} WHERE user_id = ?", self.table);
        let result = sqlx::query(&sql).bind(owner_id).execute(self.db.pool()).await?;
        Ok(result.rows_affected())
    }

    async fn reassign_activities(&self, from_owner: &str, to_owner: &str) -> Result<u64> {
        let sql = format!("UPDATE {} SET user_id = ? WHERE user_id = ?", self.table);
        let result = sqlx::query(&sql)
            .bind(to_owner)
            .bind(from_owner)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }
}

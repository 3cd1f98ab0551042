use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::PledgeData;
use sqlx::{sqlite::SqliteRow, Row};

use crate::storage::sqlite::connection::{encode_timestamp, DbConnection};
use crate::storage::RecordStorage;

/// SQLite storage for self-confidence pledges
#[derive(Clone)]
pub struct PledgeRepository {
    db: DbConnection,
}

impl PledgeRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_pledge(row: &SqliteRow) -> PledgeData {
        PledgeData {
            id: Some(row.get("id")),
            principle_1: row.get("principle_1"),
            principle_2: row.get("principle_2"),
            principle_3: row.get("principle_3"),
            principle_4: row.get("principle_4"),
            signed_at: Some(row.get("signed_at")),
        }
    }

    async fn fetch_where(&self, column: &str, value: &str) -> Result<Option<PledgeData>> {
        let row = sqlx::query(&format!(
            "SELECT id, principle_1, principle_2, principle_3, principle_4, signed_at \
             FROM self_confidence_pledges WHERE {} = ?",
            column
        ))
        .bind(value)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::row_to_pledge))
    }
}

#[async_trait]
impl RecordStorage<PledgeData> for PledgeRepository {
    async fn find_record(&self, owner_id: &str) -> Result<Option<PledgeData>> {
        self.fetch_where("user_id", owner_id).await
    }

    async fn find_record_id(&self, owner_id: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT id FROM self_confidence_pledges WHERE user_id = ?")
            .bind(owner_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|r| r.get("id")))
    }

    async fn insert_record(&self, owner_id: &str, record: &PledgeData) -> Result<PledgeData> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = encode_timestamp(&Utc::now());

        sqlx::query(
            r#"
            INSERT INTO self_confidence_pledges
                (id, user_id, principle_1, principle_2, principle_3, principle_4, signed_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(&record.principle_1)
        .bind(&record.principle_2)
        .bind(&record.principle_3)
        .bind(&record.principle_4)
        .bind(&now)
        .bind(&now)
        .execute(self.db.pool())
        .await?;

        self.fetch_where("id", &id)
            .await?
            .ok_or_else(|| anyhow!("pledge {} missing after insert", id))
    }

    async fn update_record(&self, record_id: &str, record: &PledgeData, updated_at: DateTime<Utc>) -> Result<PledgeData> {
        let result = sqlx::query(
            r#"
            UPDATE self_confidence_pledges
            SET principle_1 = ?, principle_2 = ?, principle_3 = ?, principle_4 = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&record.principle_1)
        .bind(&record.principle_2)
        .bind(&record.principle_3)
        .bind(&record.principle_4)
        .bind(encode_timestamp(&updated_at))
        .bind(record_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("pledge {} not found", record_id));
        }

        self.fetch_where("id", record_id)
            .await?
            .ok_or_else(|| anyhow!("pledge {} missing after update", record_id))
    }

    async fn delete_records(&self, owner_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM self_confidence_pledges WHERE user_id = ?")
            .bind(owner_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn reassign_records(&self, from_owner: &str, to_owner: &str) -> Result<u64> {
        let result = sqlx::query("UPDATE self_confidence_pledges SET user_id = ? WHERE user_id = ?")
            .bind(to_owner)
            .bind(from_owner)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> PledgeRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        PledgeRepository::new(db)
    }

    fn sample() -> PledgeData {
        PledgeData {
            principle_1: "Jag vet att jag kan".to_string(),
            principle_2: "Min bild".to_string(),
            principle_3: "Tio minuter".to_string(),
            principle_4: "Mitt mål".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_stamps_signed_at() {
        let repo = setup_test().await;
        let stored = repo.insert_record("device-1", &sample()).await.unwrap();

        assert!(stored.id.is_some());
        assert!(stored.signed_at.as_deref().unwrap().ends_with('Z'));
        assert_eq!(stored.principle_4, "Mitt mål");
        assert_eq!(repo.find_record("device-1").await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_update_keeps_signed_at() {
        let repo = setup_test().await;
        let stored = repo.insert_record("device-1", &sample()).await.unwrap();

        let changes = PledgeData {
            principle_2: "En ny bild".to_string(),
            ..sample()
        };
        let updated = repo
            .update_record(stored.id.as_deref().unwrap(), &changes, Utc::now())
            .await
            .unwrap();

        assert_eq!(updated.signed_at, stored.signed_at);
        assert_eq!(updated.principle_2, "En ny bild");
    }

    #[tokio::test]
    async fn test_reassign_and_delete() {
        let repo = setup_test().await;
        repo.insert_record("device-1", &sample()).await.unwrap();

        assert_eq!(repo.reassign_records("device-1", "account-1").await.unwrap(), 1);
        assert_eq!(repo.find_record_id("device-1").await.unwrap(), None);
        assert!(repo.find_record_id("account-1").await.unwrap().is_some());

        assert_eq!(repo.delete_records("account-1").await.unwrap(), 1);
        assert_eq!(repo.find_record("account-1").await.unwrap(), None);
    }
}

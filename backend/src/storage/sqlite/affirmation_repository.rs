//! SQLite storage for affirmations.
//!
//! The domain shape keeps the amount as user-entered text; this table stores
//! it as a number, so it is parsed on the way in and formatted on the way out.
//! An empty deadline is stored as NULL.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::AffirmationData;
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::validation::{format_amount, parse_amount};
use crate::storage::sqlite::connection::{encode_timestamp, DbConnection};
use crate::storage::RecordStorage;

#[derive(Clone)]
pub struct AffirmationRepository {
    db: DbConnection,
}

impl AffirmationRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_affirmation(row: &SqliteRow) -> AffirmationData {
        AffirmationData {
            id: Some(row.get("id")),
            amount: format_amount(row.get::<Option<f64>, _>("amount")),
            exchange: row.get("exchange"),
            deadline: row.get::<Option<String>, _>("deadline").unwrap_or_default(),
            plan: row.get("plan"),
            statement: row.get("statement"),
            created_at: Some(row.get("created_at")),
        }
    }

    fn stored_amount(data: &AffirmationData) -> Result<Option<f64>> {
        Ok(parse_amount(&data.amount)?)
    }

    fn stored_deadline(data: &AffirmationData) -> Option<&str> {
        Some(data.deadline.as_str()).filter(|deadline| !deadline.is_empty())
    }

    async fn find_by_id(&self, record_id: &str) -> Result<Option<AffirmationData>> {
        let row = sqlx::query(
            r#"
            SELECT id, amount, exchange, deadline, plan, statement, created_at
            FROM affirmations
            WHERE id = ?
            "#,
        )
        .bind(record_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::row_to_affirmation))
    }
}

#[async_trait]
impl RecordStorage<AffirmationData> for AffirmationRepository {
    async fn find_record(&self, owner_id: &str) -> Result<Option<AffirmationData>> {
        let row = sqlx::query(
            r#"
            SELECT id, amount, exchange, deadline, plan, statement, created_at
            FROM affirmations
            WHERE user_id = ?
            "#,
        )
        .bind(owner_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::row_to_affirmation))
    }

    async fn find_record_id(&self, owner_id: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT id FROM affirmations WHERE user_id = ?")
            .bind(owner_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|r| r.get("id")))
    }

    async fn insert_record(&self, owner_id: &str, record: &AffirmationData) -> Result<AffirmationData> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = encode_timestamp(&Utc::now());

        sqlx::query(
            r#"
            INSERT INTO affirmations (id, user_id, amount, exchange, deadline, plan, statement, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(Self::stored_amount(record)?)
        .bind(&record.exchange)
        .bind(Self::stored_deadline(record))
        .bind(&record.plan)
        .bind(&record.statement)
        .bind(&now)
        .bind(&now)
        .execute(self.db.pool())
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| anyhow!("affirmation {} missing after insert", id))
    }

    async fn update_record(
        &self,
        record_id: &str,
        record: &AffirmationData,
        updated_at: DateTime<Utc>,
    ) -> Result<AffirmationData> {
        let result = sqlx::query(
            r#"
            UPDATE affirmations
            SET amount = ?, exchange = ?, deadline = ?, plan = ?, statement = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Self::stored_amount(record)?)
        .bind(&record.exchange)
        .bind(Self::stored_deadline(record))
        .bind(&record.plan)
        .bind(&record.statement)
        .bind(encode_timestamp(&updated_at))
        .bind(record_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("affirmation {} not found", record_id));
        }

        self.find_by_id(record_id)
            .await?
            .ok_or_else(|| anyhow!("affirmation {} missing after update", record_id))
    }

    async fn delete_records(&self, owner_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM affirmations WHERE user_id = ?")
            .bind(owner_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn reassign_records(&self, from_owner: &str, to_owner: &str) -> Result<u64> {
        let result = sqlx::query("UPDATE affirmations SET user_id = ? WHERE user_id = ?")
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

    async fn setup_test() -> AffirmationRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        AffirmationRepository::new(db)
    }

    fn sample() -> AffirmationData {
        AffirmationData {
            amount: "500000".to_string(),
            exchange: "Coaching".to_string(),
            deadline: "2027-06-30".to_string(),
            plan: "Ten clients a month".to_string(),
            statement: "I will earn it".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = setup_test().await;
        let stored = repo.insert_record("device-1", &sample()).await.unwrap();

        assert!(stored.id.is_some());
        assert!(stored.created_at.is_some());
        assert_eq!(stored.amount, "500000");
        assert_eq!(stored.deadline, "2027-06-30");

        assert_eq!(repo.find_record("device-1").await.unwrap(), Some(stored.clone()));
        assert_eq!(repo.find_record_id("device-1").await.unwrap(), stored.id);
        assert_eq!(repo.find_record("device-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_amount_is_stored_as_number() {
        let repo = setup_test().await;
        let data = AffirmationData {
            amount: " 1500.50 ".to_string(),
            deadline: String::new(),
            ..sample()
        };
        repo.insert_record("device-1", &data).await.unwrap();

        let row = sqlx::query("SELECT amount, deadline FROM affirmations WHERE user_id = ?")
            .bind("device-1")
            .fetch_one(repo.db.pool())
            .await
            .unwrap();
        assert_eq!(row.get::<Option<f64>, _>("amount"), Some(1500.5));
        assert_eq!(row.get::<Option<String>, _>("deadline"), None);

        let loaded = repo.find_record("device-1").await.unwrap().unwrap();
        assert_eq!(loaded.amount, "1500.5");
        assert_eq!(loaded.deadline, "");
    }

    #[tokio::test]
    async fn test_invalid_amount_is_rejected() {
        let repo = setup_test().await;
        let data = AffirmationData {
            amount: "lots".to_string(),
            ..sample()
        };
        assert!(repo.insert_record("device-1", &data).await.is_err());
        assert_eq!(repo.find_record("device-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_one_affirmation_per_owner() {
        let repo = setup_test().await;
        repo.insert_record("device-1", &sample()).await.unwrap();
        assert!(repo.insert_record("device-1", &sample()).await.is_err());
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_created_at() {
        let repo = setup_test().await;
        let stored = repo.insert_record("device-1", &sample()).await.unwrap();
        let id = stored.id.clone().unwrap();

        let changes = AffirmationData {
            plan: "Twenty clients".to_string(),
            ..sample()
        };
        let updated = repo.update_record(&id, &changes, Utc::now()).await.unwrap();

        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.created_at, stored.created_at);
        assert_eq!(updated.plan, "Twenty clients");
        assert!(repo.update_record("missing", &changes, Utc::now()).await.is_err());
    }

    #[tokio::test]
    async fn test_reassign_and_delete() {
        let repo = setup_test().await;
        repo.insert_record("device-1", &sample()).await.unwrap();

        assert_eq!(repo.reassign_records("device-1", "account-1").await.unwrap(), 1);
        assert_eq!(repo.find_record("device-1").await.unwrap(), None);
        assert!(repo.find_record("account-1").await.unwrap().is_some());

        // The account now owns a record, so a second device cannot be moved onto it
        repo.insert_record("device-2", &sample()).await.unwrap();
        assert!(repo.reassign_records("device-2", "account-1").await.is_err());

        assert_eq!(repo.delete_records("account-1").await.unwrap(), 1);
        assert_eq!(repo.delete_records("account-1").await.unwrap(), 0);
    }
}

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

/// DbConnection owns the SQLite pool of the primary store
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating primary database at {}", url);
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the four collections; each owner has at most one record per program
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS affirmations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL UNIQUE,
                amount REAL,
                exchange TEXT NOT NULL DEFAULT '',
                deadline TEXT,
                plan TEXT NOT NULL DEFAULT '',
                statement TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS self_confidence_pledges (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL UNIQUE,
                principle_1 TEXT NOT NULL DEFAULT '',
                principle_2 TEXT NOT NULL DEFAULT '',
                principle_3 TEXT NOT NULL DEFAULT '',
                principle_4 TEXT NOT NULL DEFAULT '',
                signed_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        for (table, parent_column) in [
            ("reading_log", "affirmation_id"),
            ("self_confidence_log", "pledge_id"),
        ] {
            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    {parent_column} TEXT,
                    activity_type TEXT NOT NULL,
                    duration_minutes INTEGER,
                    logged_at TEXT NOT NULL
                );
                "#
            ))
            .execute(pool)
            .await?;

            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_user_logged ON {table}(user_id, activity_type, logged_at DESC);"
            ))
            .execute(pool)
            .await?;
        }

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Stored timestamp format; fixed width so text order matches time order
pub(crate) fn encode_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

//! # Store Handle
//!
//! Opens the SQLite file the sync engine writes into.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database::new(DbConfig)                                                │
//! │       │                                                                 │
//! │       ├── open/create file, WAL journal, foreign_keys = ON              │
//! │       ├── SqlitePool (max_connections)                                  │
//! │       └── embedded migrations                                           │
//! │                                                                         │
//! │  per record:   properties().exists(id)  ──►  begin_sync() ... commit()  │
//! │  read side:    properties().get_by_id / list / counts                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Foreign keys must be on for every connection: the reconciler relies on
//! `properties → users/agents/cover_photos` and `locations → properties`
//! being enforced inside its transaction.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::property::PropertyRepository;
use crate::repository::sync::SyncTransaction;

/// Where the store lives and how many connections may be open on it.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
}

impl DbConfig {
    /// Store at `path`, created on first open. Defaults to 5 connections.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Private in-memory store for tests.
    ///
    /// Capped at one connection: each SQLite connection to `:memory:` sees
    /// its own empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
        }
    }
}

/// Handle to the local property store. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the store and brings its schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening property store");

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());
        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        migrations::run(&pool).await?;

        info!(max_connections = config.max_connections, "Property store ready");
        Ok(Database { pool })
    }

    /// Raw pool, for queries the repositories don't cover.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn properties(&self) -> PropertyRepository {
        PropertyRepository::new(self.pool.clone())
    }

    /// Opens a transaction scoped to one record's upserts.
    ///
    /// Dropping the returned handle without calling
    /// [`SyncTransaction::commit`] rolls everything back.
    pub async fn begin_sync(&self) -> DbResult<SyncTransaction> {
        let tx = self.pool.begin().await.map_err(DbError::transaction)?;
        Ok(SyncTransaction::new(tx))
    }

    pub async fn close(&self) {
        info!("Closing property store");
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_store_is_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let counts = db.properties().counts().await.unwrap();
        assert_eq!(counts.properties, 0);
        assert_eq!(counts.users, 0);
    }

    #[tokio::test]
    async fn test_schema_created() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(
            tables,
            vec!["agents", "cover_photos", "locations", "properties", "users"]
        );
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!("valuations-pool-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let db = Database::new(DbConfig::new(&path).max_connections(2)).await.unwrap();
        sqlx::query(
            "INSERT INTO users (id, email, created_at, updated_at) \
             VALUES (1, 'owner@example.com', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
            .execute(db.pool())
            .await
            .unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(reopened.properties().counts().await.unwrap().users, 1);
        reopened.close().await;
        let _ = std::fs::remove_file(&path);
    }
}

//! # Schema Migrations
//!
//! The property graph schema (`users`, `agents`, `cover_photos`,
//! `properties`, `locations`) ships inside the binary as the SQL files under
//! `migrations/sqlite/`. [`Database::new`](crate::Database::new) applies any
//! that the store has not seen yet, so a sync always runs against the
//! current schema.
//!
//! Applied files are tracked by checksum in `_sqlx_migrations`. Schema
//! changes go in a new `NNN_description.sql`; an edited file that was
//! already applied fails the checksum and stops startup.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations. A store that is already current is untouched.
pub(crate) async fn run(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(migrations = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn applied(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_applies_every_migration() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(!MIGRATOR.migrations.is_empty());
        assert_eq!(applied(db.pool()).await, MIGRATOR.migrations.len() as i64);
    }

    #[tokio::test]
    async fn test_rerun_is_noop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        run(db.pool()).await.unwrap();
        assert_eq!(applied(db.pool()).await, MIGRATOR.migrations.len() as i64);
    }
}

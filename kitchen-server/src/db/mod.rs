//! Database Module
//!
//! SQLite connection pool and embedded migrations

pub mod repository;

use repository::{RepoError, RepoResult};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Database service, owns a SQLite connection pool
#[derive(Clone, Debug)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database with WAL, foreign keys and a 5s busy
    /// timeout, then apply migrations
    pub async fn new(database_url: &str) -> RepoResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RepoError::Database(format!("Invalid database url: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            // wait on write conflicts instead of failing with SQLITE_BUSY
            .busy_timeout(Duration::from_millis(5000))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| RepoError::Database(format!("Failed to open database: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database (single connection so every query sees
    /// the same memory db)
    pub async fn in_memory() -> RepoResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| RepoError::Database(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| RepoError::Database(format!("Failed to open database: {e}")))?;

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> RepoResult<()> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| RepoError::Database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_database_is_created_and_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kitchen.db");
        let url = format!("sqlite:{}", path.display());

        let db = DbService::new(&url).await.unwrap();
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(users, 0);
        assert!(path.exists());
        db.pool.close().await;

        // reopening applies no migration twice
        let db = DbService::new(&url).await.unwrap();
        db.pool.close().await;
    }

    #[tokio::test]
    async fn test_in_memory_enforces_foreign_keys() {
        let db = DbService::in_memory().await.unwrap();
        let result = sqlx::query(
            r#"
            INSERT INTO stock_movements (
                id, inventory_item_id, seq, movement_type, quantity, applied_quantity,
                reason, unit_cost, total_cost, balance_after, movement_date, created_at
            )
            VALUES (1, 999, 1, 'in', 1.0, 1.0, 'x', 0.0, 0.0, 1.0, 0, 0)
            "#,
        )
        .execute(&db.pool)
        .await;
        let err = result.unwrap_err();
        assert!(
            err.as_database_error()
                .is_some_and(|e| e.is_foreign_key_violation())
        );
    }
}

//! Repository Module
//!
//! Free async functions over a `SqlitePool` (or an open transaction) per table.
//! Multi-row writes run inside one transaction opened with [`begin_write`].

pub mod inventory;
pub mod order;
pub mod payroll;
pub mod purchase_order;
pub mod recipe;
pub mod report;
pub mod staff;
pub mod stock_movement;
pub mod supplier;
pub mod user;

use shared::error::{AppError, ErrorCode};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Business rule conflict (illegal transition, row still referenced, ...)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Pre-classified application error, passed through unchanged
    #[error("{0}")]
    App(AppError),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepoError::Conflict("Record is referenced by other records".into())
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                RepoError::Validation(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<AppError> for RepoError {
    fn from(err: AppError) -> Self {
        RepoError::App(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Conflict(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::App(app) => app,
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open a write transaction.
///
/// `BEGIN IMMEDIATE` takes the write lock up front, so a second writer waits
/// on `busy_timeout` instead of failing when its read lock cannot be upgraded.
pub(crate) async fn begin_write(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Clamp list paging parameters
pub(crate) fn paging(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        limit.unwrap_or(100).clamp(1, 1000),
        offset.unwrap_or(0).max(0),
    )
}

/// Next `PREFIX-YYYYMMDD-NNNN` document number for today. Runs inside the
/// caller's transaction so the number and the insert are atomic.
pub(crate) async fn next_document_number(
    conn: &mut sqlx::SqliteConnection,
    table: &'static str,
    column: &'static str,
    prefix: &str,
) -> RepoResult<String> {
    let day_prefix = format!(
        "{prefix}-{}-",
        shared::util::date_stamp(shared::util::now_millis())
    );
    let sql = format!(
        r#"
        SELECT COALESCE(MAX(CAST(substr({column}, ?2) AS INTEGER)), 0) + 1
        FROM {table}
        WHERE {column} LIKE ?1 || '%'
        "#
    );
    let next: i64 = sqlx::query_scalar(&sql)
        .bind(&day_prefix)
        .bind(day_prefix.len() as i64 + 1)
        .fetch_one(&mut *conn)
        .await?;
    Ok(format!("{day_prefix}{next:04}"))
}

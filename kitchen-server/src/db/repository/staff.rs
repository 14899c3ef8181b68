//! Staff Repository
//!
//! A staff member is a `users` row (login, role) plus a `staff_members` row
//! (employment data). Both are written and removed together.

use super::{RepoError, RepoResult, begin_write};
use crate::auth::password;
use shared::error::{AppError, ErrorCode};
use shared::models::{Staff, StaffCreate, StaffUpdate};
use sqlx::SqlitePool;

const STAFF_SELECT: &str = r#"
    SELECT s.id, s.user_id, u.name, u.email, u.role, u.phone, s.position, s.hourly_rate,
           s.hire_date, s.notes, u.is_active, s.created_at
    FROM staff_members s
    JOIN users u ON u.id = s.user_id
"#;

fn staff_not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::StaffNotFound, format!("Staff member {id} not found")).into()
}

fn email_taken(err: sqlx::Error, email: &str) -> RepoError {
    match RepoError::from(err) {
        RepoError::Duplicate(_) => AppError::with_message(
            ErrorCode::EmailExists,
            format!("Email '{email}' is already registered"),
        )
        .into(),
        other => other,
    }
}

fn hash(plain: &str) -> RepoResult<String> {
    password::hash_password(plain)
        .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Staff>> {
    let staff = sqlx::query_as::<_, Staff>(&format!("{STAFF_SELECT} ORDER BY u.name"))
        .fetch_all(pool)
        .await?;
    Ok(staff)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Staff>> {
    let staff = sqlx::query_as::<_, Staff>(&format!("{STAFF_SELECT} WHERE s.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(staff)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Staff> {
    find_by_id(pool, id).await?.ok_or_else(|| staff_not_found(id))
}

/// Create the user account and the staff record in one transaction
pub async fn create(pool: &SqlitePool, data: StaffCreate) -> RepoResult<Staff> {
    let password_hash = hash(&data.password)?;
    let now = shared::util::now_millis();
    let user_id = shared::util::snowflake_id();
    let staff_id = shared::util::snowflake_id();
    let email = data.email.trim();

    let mut tx = begin_write(pool).await?;

    sqlx::query(
        r#"
        INSERT INTO users (
            id, name, email, role, phone, password_hash, is_active, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)
        "#,
    )
    .bind(user_id)
    .bind(data.name.trim())
    .bind(email)
    .bind(data.role)
    .bind(data.phone.as_deref())
    .bind(password_hash)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| email_taken(e, email))?;

    sqlx::query(
        r#"
        INSERT INTO staff_members (
            id, user_id, position, hourly_rate, hire_date, notes, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
        "#,
    )
    .bind(staff_id)
    .bind(user_id)
    .bind(data.position.trim())
    .bind(data.hourly_rate)
    .bind(data.hire_date.as_deref())
    .bind(data.notes.as_deref())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(staff_id, user_id, role = %data.role, "Staff member created");
    get(pool, staff_id).await
}

pub async fn update(pool: &SqlitePool, id: i64, data: StaffUpdate) -> RepoResult<Staff> {
    let password_hash = data.password.as_deref().map(hash).transpose()?;
    let now = shared::util::now_millis();

    let mut tx = begin_write(pool).await?;

    let user_id: i64 = sqlx::query_scalar("SELECT user_id FROM staff_members WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| staff_not_found(id))?;

    let email = data.email.as_deref().map(str::trim);
    sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?1, name), email = COALESCE(?2, email),
            role = COALESCE(?3, role), phone = COALESCE(?4, phone),
            password_hash = COALESCE(?5, password_hash),
            is_active = COALESCE(?6, is_active), updated_at = ?7
        WHERE id = ?8
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(email)
    .bind(data.role)
    .bind(data.phone.as_deref())
    .bind(password_hash)
    .bind(data.is_active)
    .bind(now)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| email_taken(e, email.unwrap_or_default()))?;

    sqlx::query(
        r#"
        UPDATE staff_members
        SET position = COALESCE(?1, position), hourly_rate = COALESCE(?2, hourly_rate),
            hire_date = COALESCE(?3, hire_date), notes = COALESCE(?4, notes),
            updated_at = ?5
        WHERE id = ?6
        "#,
    )
    .bind(data.position.as_deref().map(str::trim))
    .bind(data.hourly_rate)
    .bind(data.hire_date.as_deref())
    .bind(data.notes.as_deref())
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    get(pool, id).await
}

/// Remove the staff record and its user account. `acting_user_id` may not
/// delete their own account.
///
/// Paid payroll entries block the delete; deactivate the account instead.
/// Pending entries go with the staff record. Ledger rows keep the user id
/// and name they were booked with.
pub async fn delete(pool: &SqlitePool, id: i64, acting_user_id: i64) -> RepoResult<()> {
    let mut tx = begin_write(pool).await?;

    let user_id: i64 = sqlx::query_scalar("SELECT user_id FROM staff_members WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| staff_not_found(id))?;

    if user_id == acting_user_id {
        return Err(AppError::with_message(
            ErrorCode::CannotDeleteSelf,
            "You cannot delete your own account",
        )
        .into());
    }

    let paid: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM payroll_entries WHERE staff_id = ? AND status = 'paid'",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;
    if paid > 0 {
        return Err(AppError::with_message(
            ErrorCode::StaffHasPaidPayroll,
            format!("Staff member {id} has {paid} paid payroll entries; deactivate the account instead"),
        )
        .with_detail("paid_entries", paid)
        .into());
    }

    sqlx::query("DELETE FROM payroll_entries WHERE staff_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM staff_members WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(staff_id = id, user_id, "Staff member deleted");
    Ok(())
}

//! User Account Repository

use super::{RepoError, RepoResult, begin_write};
use crate::auth::password;
use shared::models::{User, UserRole};
use sqlx::SqlitePool;

const USER_SELECT: &str = r#"
    SELECT id, name, email, role, phone, password_hash, is_active, created_at
    FROM users
"#;

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE email = ? LIMIT 1"))
        .bind(email.trim())
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn update_password(pool: &SqlitePool, id: i64, new_password: &str) -> RepoResult<()> {
    let hash = password::hash_password(new_password)
        .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;
    let rows = sqlx::query("UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(hash)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

/// Create the first admin account. Does nothing (returns `false`) once any
/// user exists.
pub async fn bootstrap_admin(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    admin_password: &str,
) -> RepoResult<bool> {
    if count(pool).await? > 0 {
        return Ok(false);
    }

    let hash = password::hash_password(admin_password)
        .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;
    let now = shared::util::now_millis();
    let user_id = shared::util::snowflake_id();

    let mut tx = begin_write(pool).await?;
    // re-check under the write lock
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        return Ok(false);
    }
    sqlx::query(
        r#"
        INSERT INTO users (
            id, name, email, role, phone, password_hash, is_active, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, NULL, ?5, 1, ?6, ?6)
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(email.trim())
    .bind(UserRole::Admin)
    .bind(hash)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO staff_members (
            id, user_id, position, hourly_rate, created_at, updated_at
        )
        VALUES (?1, ?2, 'Administrator', 0, ?3, ?3)
        "#,
    )
    .bind(shared::util::snowflake_id())
    .bind(user_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn test_bootstrap_admin_only_once() {
        let pool = test_pool().await;
        assert!(bootstrap_admin(&pool, "Admin", "admin@kitchen.test", "supersecret").await.unwrap());
        assert!(!bootstrap_admin(&pool, "Admin", "other@kitchen.test", "supersecret").await.unwrap());
        assert_eq!(count(&pool).await.unwrap(), 1);

        let admin = find_by_email(&pool, "ADMIN@kitchen.test").await.unwrap().unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert!(password::verify_password("supersecret", &admin.password_hash));
    }

    #[tokio::test]
    async fn test_update_password() {
        let pool = test_pool().await;
        bootstrap_admin(&pool, "Admin", "admin@kitchen.test", "supersecret").await.unwrap();
        let admin = find_by_email(&pool, "admin@kitchen.test").await.unwrap().unwrap();

        update_password(&pool, admin.id, "new-password-1").await.unwrap();
        let admin = find_by_id(&pool, admin.id).await.unwrap().unwrap();
        assert!(password::verify_password("new-password-1", &admin.password_hash));
        assert!(matches!(
            update_password(&pool, 1, "whatever-123").await,
            Err(RepoError::NotFound(_))
        ));
    }
}

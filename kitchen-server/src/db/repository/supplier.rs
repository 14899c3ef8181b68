//! Supplier Repository

use super::{RepoError, RepoResult, begin_write};
use shared::error::{AppError, ErrorCode};
use shared::models::{Supplier, SupplierCreate, SupplierUpdate};
use sqlx::SqlitePool;
use sqlx::types::Json;

const SUPPLIER_SELECT: &str = r#"
    SELECT id, name, contact_person, email, phone, address, categories, rating,
           is_active, created_at, updated_at
    FROM suppliers
"#;

fn supplier_not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::SupplierNotFound, format!("Supplier {id} not found")).into()
}

fn name_taken(err: sqlx::Error, name: &str) -> RepoError {
    match RepoError::from(err) {
        RepoError::Duplicate(_) => AppError::with_message(
            ErrorCode::SupplierNameExists,
            format!("Supplier '{name}' already exists"),
        )
        .into(),
        other => other,
    }
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Supplier>> {
    let suppliers = sqlx::query_as::<_, Supplier>(&format!("{SUPPLIER_SELECT} ORDER BY name"))
        .fetch_all(pool)
        .await?;
    Ok(suppliers)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Supplier>> {
    let supplier = sqlx::query_as::<_, Supplier>(&format!("{SUPPLIER_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(supplier)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Supplier> {
    find_by_id(pool, id).await?.ok_or_else(|| supplier_not_found(id))
}

pub async fn create(pool: &SqlitePool, data: SupplierCreate) -> RepoResult<Supplier> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let name = data.name.trim();

    sqlx::query(
        r#"
        INSERT INTO suppliers (
            id, name, contact_person, email, phone, address, categories, rating, is_active,
            created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(data.contact_person.as_deref())
    .bind(data.email.as_deref())
    .bind(data.phone.as_deref())
    .bind(data.address.as_deref())
    .bind(Json(&data.categories))
    .bind(data.rating)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| name_taken(e, name))?;

    get(pool, id).await
}

pub async fn update(pool: &SqlitePool, id: i64, data: SupplierUpdate) -> RepoResult<Supplier> {
    let name = data.name.as_deref().map(str::trim);
    let rows = sqlx::query(
        r#"
        UPDATE suppliers
        SET name = COALESCE(?1, name), contact_person = COALESCE(?2, contact_person),
            email = COALESCE(?3, email), phone = COALESCE(?4, phone),
            address = COALESCE(?5, address), categories = COALESCE(?6, categories),
            rating = COALESCE(?7, rating), is_active = COALESCE(?8, is_active),
            updated_at = ?9
        WHERE id = ?10
        "#,
    )
    .bind(name)
    .bind(data.contact_person.as_deref())
    .bind(data.email.as_deref())
    .bind(data.phone.as_deref())
    .bind(data.address.as_deref())
    .bind(data.categories.as_ref().map(Json))
    .bind(data.rating)
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| name_taken(e, name.unwrap_or_default()))?;

    if rows.rows_affected() == 0 {
        return Err(supplier_not_found(id));
    }
    get(pool, id).await
}

/// Delete a supplier without purchase orders
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = begin_write(pool).await?;
    let orders: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM purchase_orders WHERE supplier_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if orders > 0 {
        return Err(AppError::with_message(
            ErrorCode::SupplierHasPurchaseOrders,
            format!("Supplier {id} has {orders} purchase orders; deactivate it instead"),
        )
        .into());
    }

    let rows = sqlx::query("DELETE FROM suppliers WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(supplier_not_found(id));
    }
    tx.commit().await?;
    Ok(())
}

//! Inventory Item Repository

use super::stock_movement::{self, NewMovement};
use super::{RepoError, RepoResult, begin_write};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    INITIAL_STOCK_REASON, InventoryItem, InventoryItemCreate, InventoryItemUpdate, InventoryQuery,
    MovementType,
};
use sqlx::SqlitePool;

const ITEM_SELECT: &str = r#"
    SELECT id, name, category, current_stock, unit, min_stock, max_stock, cost_per_unit,
           supplier, last_restocked, expiry_date,
           (current_stock <= min_stock) AS is_low_stock, created_at, updated_at
    FROM inventory_items
"#;

fn item_not_found(id: i64) -> RepoError {
    AppError::with_message(
        ErrorCode::InventoryItemNotFound,
        format!("Inventory item {id} not found"),
    )
    .into()
}

fn name_taken(err: sqlx::Error, name: &str) -> RepoError {
    match RepoError::from(err) {
        RepoError::Duplicate(_) => AppError::with_message(
            ErrorCode::InventoryItemNameExists,
            format!("Inventory item '{name}' already exists"),
        )
        .into(),
        other => other,
    }
}

pub async fn find_all(pool: &SqlitePool, query: &InventoryQuery) -> RepoResult<Vec<InventoryItem>> {
    let sql = format!(
        r#"
        {ITEM_SELECT}
        WHERE (?1 IS NULL OR category = ?1) AND (?2 IS NULL OR name LIKE '%' || ?2 || '%')
        ORDER BY name
        "#
    );
    let items = sqlx::query_as::<_, InventoryItem>(&sql)
        .bind(query.category)
        .bind(query.search.as_deref())
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<InventoryItem>> {
    let item = sqlx::query_as::<_, InventoryItem>(&format!("{ITEM_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<InventoryItem> {
    find_by_id(pool, id).await?.ok_or_else(|| item_not_found(id))
}

/// Items at or below their minimum stock, most depleted first
pub async fn find_low_stock(pool: &SqlitePool) -> RepoResult<Vec<InventoryItem>> {
    let items = sqlx::query_as::<_, InventoryItem>(&format!(
        r#"
        {ITEM_SELECT}
        WHERE current_stock <= min_stock
        ORDER BY (current_stock - min_stock) ASC, name
        "#
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Create an item. Stock on hand is booked through the ledger as an
/// "Initial stock" movement in the same transaction.
pub async fn create(
    pool: &SqlitePool,
    data: InventoryItemCreate,
    performed_by: Option<i64>,
) -> RepoResult<InventoryItem> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = begin_write(pool).await?;

    sqlx::query(
        r#"
        INSERT INTO inventory_items (
            id, name, category, current_stock, unit, min_stock, max_stock, cost_per_unit,
            supplier, expiry_date, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
        "#,
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.category)
    .bind(&data.unit)
    .bind(data.min_stock)
    .bind(data.max_stock)
    .bind(data.cost_per_unit)
    .bind(data.supplier.as_deref())
    .bind(data.expiry_date.as_deref())
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| name_taken(e, &data.name))?;

    if data.current_stock > 0.0 {
        stock_movement::record_in_tx(
            &mut tx,
            id,
            NewMovement {
                movement_type: MovementType::In,
                quantity: data.current_stock,
                reason: INITIAL_STOCK_REASON.to_string(),
                reference_number: None,
                unit_cost: Some(data.cost_per_unit),
                notes: None,
                movement_date: now,
                allow_negative: false,
                performed_by,
            },
        )
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create inventory item".into()))
}

/// Update descriptive fields. `current_stock` is never touched here.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: InventoryItemUpdate,
) -> RepoResult<InventoryItem> {
    let now = shared::util::now_millis();
    let name = data.name.as_deref().map(str::trim);

    let rows = sqlx::query(
        r#"
        UPDATE inventory_items
        SET name = COALESCE(?1, name), category = COALESCE(?2, category),
            unit = COALESCE(?3, unit), min_stock = COALESCE(?4, min_stock),
            max_stock = COALESCE(?5, max_stock),
            cost_per_unit = COALESCE(?6, cost_per_unit), supplier = COALESCE(?7, supplier),
            expiry_date = COALESCE(?8, expiry_date), updated_at = ?9
        WHERE id = ?10
        "#,
    )
    .bind(name)
    .bind(data.category)
    .bind(data.unit.as_deref())
    .bind(data.min_stock)
    .bind(data.max_stock)
    .bind(data.cost_per_unit)
    .bind(data.supplier.as_deref())
    .bind(data.expiry_date.as_deref())
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| name_taken(e, name.unwrap_or_default()))?;

    if rows.rows_affected() == 0 {
        return Err(item_not_found(id));
    }
    get(pool, id).await
}

/// Delete an item.
///
/// An item with ledger history is only removed with `force`, which drops
/// the history with it. Items referenced by recipes or purchase orders are
/// never removed.
pub async fn delete(pool: &SqlitePool, id: i64, force: bool) -> RepoResult<()> {
    let mut tx = begin_write(pool).await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM inventory_items WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(item_not_found(id));
    }

    let references: i64 = sqlx::query_scalar(
        r#"
        SELECT (SELECT COUNT(*) FROM recipe_ingredients WHERE inventory_item_id = ?1)
             + (SELECT COUNT(*) FROM purchase_order_lines WHERE inventory_item_id = ?1)
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;
    if references > 0 {
        return Err(AppError::with_message(
            ErrorCode::InventoryItemInUse,
            format!("Inventory item {id} is used by recipes or purchase orders"),
        )
        .into());
    }

    let movements: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements WHERE inventory_item_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if movements > 0 && !force {
        return Err(AppError::with_message(
            ErrorCode::InventoryItemHasMovements,
            format!("Inventory item {id} has {movements} stock movements; use force=true to delete them too"),
        )
        .with_detail("movement_count", movements)
        .into());
    }

    // stock_movements cascade
    sqlx::query("DELETE FROM inventory_items WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

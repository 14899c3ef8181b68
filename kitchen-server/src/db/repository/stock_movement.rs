//! Stock Movement Repository (inventory ledger)
//!
//! Every balance change goes through [`record_in_tx`]: the item row is
//! updated with in-SQL arithmetic and the movement is appended in the same
//! write transaction, so the ledger and `current_stock` cannot diverge.

use super::{RepoError, RepoResult, begin_write, paging};
use crate::utils::money;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    LedgerReconciliation, MovementQuery, MovementType, StockMovement, StockMovementCreate,
};
use sqlx::{SqliteConnection, SqlitePool};

const MOVEMENT_SELECT: &str = r#"
    SELECT m.id, m.inventory_item_id, i.name AS item_name, m.movement_type,
           m.quantity, m.applied_quantity, m.reason, m.reference_number,
           m.unit_cost, m.total_cost, m.balance_after,
           m.performed_by, m.performed_by_name, m.notes, m.movement_date, m.created_at
    FROM stock_movements m
    JOIN inventory_items i ON i.id = m.inventory_item_id
"#;

const MOVEMENT_FILTER: &str = r#"
    (?1 IS NULL OR m.movement_type = ?1)
    AND (?2 IS NULL OR m.movement_date >= ?2)
    AND (?3 IS NULL OR m.movement_date <= ?3)
"#;

/// Tolerance for comparing summed REAL quantities
const LEDGER_EPSILON: f64 = 1e-6;

/// A movement about to be booked
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub movement_type: MovementType,
    pub quantity: f64,
    pub reason: String,
    pub reference_number: Option<String>,
    /// `in`: refreshes the item's cost_per_unit. Ignored for `out`.
    pub unit_cost: Option<f64>,
    pub notes: Option<String>,
    pub movement_date: i64,
    pub allow_negative: bool,
    pub performed_by: Option<i64>,
}

impl NewMovement {
    pub fn from_request(data: StockMovementCreate, performed_by: Option<i64>) -> Self {
        Self {
            movement_type: data.movement_type,
            quantity: data.quantity,
            reason: data.reason.trim().to_string(),
            reference_number: data.reference_number,
            unit_cost: data.unit_cost,
            notes: data.notes,
            movement_date: data
                .movement_date
                .unwrap_or_else(shared::util::now_millis),
            allow_negative: data.allow_negative,
            performed_by,
        }
    }

    /// Balance change this movement makes on `balance_before`.
    ///
    /// A clamped `out` only removes what is on hand and never raises a
    /// balance that is already negative.
    fn applied_quantity(&self, balance_before: f64) -> f64 {
        match self.movement_type {
            MovementType::In => self.quantity,
            MovementType::Out if self.allow_negative => self.quantity,
            MovementType::Out => self.quantity.min(balance_before.max(0.0)),
        }
    }
}

/// Book one movement inside an open write transaction.
///
/// `out` movements clamp the balance at zero unless `allow_negative` is set.
pub async fn record_in_tx(
    conn: &mut SqliteConnection,
    item_id: i64,
    movement: NewMovement,
) -> RepoResult<StockMovement> {
    money::validate_stock_quantity(movement.quantity, "quantity")?;
    if let Some(cost) = movement.unit_cost {
        money::validate_amount(cost, "unit_cost")?;
    }

    let now = shared::util::now_millis();
    let is_in = movement.movement_type == MovementType::In;

    let balance_before: f64 =
        sqlx::query_scalar("SELECT current_stock FROM inventory_items WHERE id = ?")
            .bind(item_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| {
                RepoError::App(AppError::with_message(
                    ErrorCode::InventoryItemNotFound,
                    format!("Inventory item {item_id} not found"),
                ))
            })?;

    if is_in && balance_before + movement.quantity > money::MAX_STOCK_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::InvalidStockQuantity,
            format!(
                "Stock of item {item_id} would exceed {}",
                money::MAX_STOCK_QUANTITY
            ),
        )
        .with_detail("field", "quantity")
        .into());
    }
    let applied_quantity = movement.applied_quantity(balance_before);

    let (balance_after, unit_cost, item_name): (f64, f64, String) = sqlx::query_as(
        r#"
        UPDATE inventory_items
        SET current_stock = CASE
                WHEN ?1 THEN current_stock + ?2
                WHEN ?3 THEN current_stock - ?2
                ELSE MAX(current_stock - ?2, MIN(current_stock, 0.0))
            END,
            cost_per_unit = CASE WHEN ?1 THEN COALESCE(?4, cost_per_unit) ELSE cost_per_unit END,
            last_restocked = CASE WHEN ?1 THEN ?5 ELSE last_restocked END,
            updated_at = ?6
        WHERE id = ?7
        RETURNING current_stock, cost_per_unit, name
        "#,
    )
    .bind(is_in)
    .bind(movement.quantity)
    .bind(movement.allow_negative)
    .bind(movement.unit_cost)
    .bind(movement.movement_date)
    .bind(now)
    .bind(item_id)
    .fetch_one(&mut *conn)
    .await?;

    let total_cost = if is_in {
        money::line_total(movement.quantity, unit_cost)
    } else {
        0.0
    };

    let performed_by_name: Option<String> = match movement.performed_by {
        Some(user_id) => sqlx::query_scalar("SELECT name FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?,
        None => None,
    };

    let seq: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(seq), 0) + 1 FROM stock_movements WHERE inventory_item_id = ?",
    )
    .bind(item_id)
    .fetch_one(&mut *conn)
    .await?;

    let id = shared::util::snowflake_id();
    sqlx::query(
        r#"
        INSERT INTO stock_movements (
            id, inventory_item_id, seq, movement_type, quantity, applied_quantity,
            reason, reference_number, unit_cost, total_cost, balance_after,
            performed_by, performed_by_name, notes, movement_date, created_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
        "#,
    )
    .bind(id)
    .bind(item_id)
    .bind(seq)
    .bind(movement.movement_type)
    .bind(movement.quantity)
    .bind(applied_quantity)
    .bind(&movement.reason)
    .bind(movement.reference_number.as_deref())
    .bind(unit_cost)
    .bind(total_cost)
    .bind(balance_after)
    .bind(movement.performed_by)
    .bind(performed_by_name.as_deref())
    .bind(movement.notes.as_deref())
    .bind(movement.movement_date)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    tracing::debug!(
        item_id,
        movement = movement.movement_type.as_str(),
        quantity = movement.quantity,
        applied_quantity,
        balance_after,
        "Stock movement recorded"
    );

    Ok(StockMovement {
        id,
        inventory_item_id: item_id,
        item_name,
        movement_type: movement.movement_type,
        quantity: movement.quantity,
        applied_quantity,
        reason: movement.reason,
        reference_number: movement.reference_number,
        unit_cost,
        total_cost,
        balance_after,
        performed_by: movement.performed_by,
        performed_by_name,
        notes: movement.notes,
        movement_date: movement.movement_date,
        created_at: now,
    })
}

/// Record a movement in its own transaction
pub async fn record(
    pool: &SqlitePool,
    item_id: i64,
    data: StockMovementCreate,
    performed_by: Option<i64>,
) -> RepoResult<StockMovement> {
    let mut tx = begin_write(pool).await?;
    let movement =
        record_in_tx(&mut tx, item_id, NewMovement::from_request(data, performed_by)).await?;
    tx.commit().await?;
    Ok(movement)
}

/// Ledger of one item, newest first
pub async fn find_by_item(
    pool: &SqlitePool,
    item_id: i64,
    query: &MovementQuery,
) -> RepoResult<Vec<StockMovement>> {
    let (limit, offset) = paging(query.limit, query.offset);
    let sql = format!(
        r#"
        {MOVEMENT_SELECT}
        WHERE m.inventory_item_id = ?4 AND {MOVEMENT_FILTER}
        ORDER BY m.seq DESC
        LIMIT ?5 OFFSET ?6
        "#
    );
    let movements = sqlx::query_as::<_, StockMovement>(&sql)
        .bind(query.movement_type)
        .bind(query.from)
        .bind(query.to)
        .bind(item_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(movements)
}

/// Movements across all items, newest first
pub async fn find_all(pool: &SqlitePool, query: &MovementQuery) -> RepoResult<Vec<StockMovement>> {
    let (limit, offset) = paging(query.limit, query.offset);
    let sql = format!(
        r#"
        {MOVEMENT_SELECT}
        WHERE {MOVEMENT_FILTER}
        ORDER BY m.movement_date DESC, m.created_at DESC, m.seq DESC
        LIMIT ?4 OFFSET ?5
        "#
    );
    let movements = sqlx::query_as::<_, StockMovement>(&sql)
        .bind(query.movement_type)
        .bind(query.from)
        .bind(query.to)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(movements)
}

/// Compare the ledger with the stored balance of one item
pub async fn reconcile(pool: &SqlitePool, item_id: i64) -> RepoResult<LedgerReconciliation> {
    let current_stock: f64 =
        sqlx::query_scalar("SELECT current_stock FROM inventory_items WHERE id = ?")
            .bind(item_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                RepoError::App(AppError::with_message(
                    ErrorCode::InventoryItemNotFound,
                    format!("Inventory item {item_id} not found"),
                ))
            })?;

    let (total_in, total_out, movement_count): (f64, f64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(CASE WHEN movement_type = 'in' THEN applied_quantity ELSE 0.0 END), 0.0),
               COALESCE(SUM(CASE WHEN movement_type = 'out' THEN applied_quantity ELSE 0.0 END), 0.0),
               COUNT(*)
        FROM stock_movements
        WHERE inventory_item_id = ?
        "#,
    )
    .bind(item_id)
    .fetch_one(pool)
    .await?;

    let ledger_balance: Option<f64> = sqlx::query_scalar(
        r#"
        SELECT balance_after
        FROM stock_movements
        WHERE inventory_item_id = ?
        ORDER BY seq DESC
        LIMIT 1
        "#,
    )
    .bind(item_id)
    .fetch_optional(pool)
    .await?;

    let drift = current_stock - (total_in - total_out);
    let balance_matches = (current_stock - ledger_balance.unwrap_or(0.0)).abs() < LEDGER_EPSILON;

    Ok(LedgerReconciliation {
        inventory_item_id: item_id,
        total_in: money::to_f64(money::to_decimal(total_in)),
        total_out: money::to_f64(money::to_decimal(total_out)),
        movement_count,
        ledger_balance,
        current_stock,
        drift,
        is_consistent: drift.abs() < LEDGER_EPSILON && balance_matches,
    })
}

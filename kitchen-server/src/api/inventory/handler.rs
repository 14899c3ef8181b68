//! Inventory API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::AppResult;
use shared::models::{
    DeleteQuery, InventoryItem, InventoryItemCreate, InventoryItemUpdate, InventoryQuery,
    LedgerReconciliation, MOVEMENT_REASONS, MovementQuery, StockMovement, StockMovementCreate,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{inventory, stock_movement};
use crate::utils::money;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, ValidatedJson, validate_optional_date,
    validate_required_text,
};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<InventoryQuery>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = inventory::find_all(state.pool(), &query).await?;
    Ok(Json(items))
}

/// Items at or below their minimum stock
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = inventory::find_low_stock(state.pool()).await?;
    Ok(Json(items))
}

pub async fn movement_reasons() -> Json<&'static [&'static str]> {
    Json(MOVEMENT_REASONS)
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<InventoryItem>> {
    let item = inventory::get(state.pool(), id).await?;
    Ok(Json(item))
}

pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ValidatedJson(payload): ValidatedJson<InventoryItemCreate>,
) -> AppResult<Json<InventoryItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    validate_optional_date(&payload.expiry_date, "expiry_date")?;
    money::validate_amount(payload.cost_per_unit, "cost_per_unit")?;

    let item = inventory::create(state.pool(), payload, Some(current.id)).await?;
    tracing::info!(item_id = item.id, name = %item.name, stock = item.current_stock, "Inventory item created");
    Ok(Json(item))
}

/// Update descriptive fields; stock only moves through movements
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<InventoryItemUpdate>,
) -> AppResult<Json<InventoryItem>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_date(&payload.expiry_date, "expiry_date")?;
    if let Some(cost) = payload.cost_per_unit {
        money::validate_amount(cost, "cost_per_unit")?;
    }

    let item = inventory::update(state.pool(), id, payload).await?;
    Ok(Json(item))
}

/// `?force=true` also deletes the item's movement history
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<Json<bool>> {
    inventory::delete(state.pool(), id, query.force).await?;
    tracing::info!(item_id = id, force = query.force, "Inventory item deleted");
    Ok(Json(true))
}

/// Book a stock-in or stock-out for the item
pub async fn record_movement(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<StockMovementCreate>,
) -> AppResult<Json<StockMovement>> {
    validate_required_text(&payload.reason, "reason", MAX_NAME_LEN)?;
    let movement = stock_movement::record(state.pool(), id, payload, Some(current.id)).await?;
    tracing::info!(
        item_id = id,
        movement = movement.movement_type.as_str(),
        quantity = movement.quantity,
        balance_after = movement.balance_after,
        user_id = current.id,
        "Stock movement booked"
    );
    Ok(Json(movement))
}

/// Ledger of one item, newest first
pub async fn item_movements(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<Vec<StockMovement>>> {
    inventory::get(state.pool(), id).await?;
    let movements = stock_movement::find_by_item(state.pool(), id, &query).await?;
    Ok(Json(movements))
}

pub async fn list_movements(
    State(state): State<ServerState>,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let movements = stock_movement::find_all(state.pool(), &query).await?;
    Ok(Json(movements))
}

pub async fn reconcile(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<LedgerReconciliation>> {
    let report = stock_movement::reconcile(state.pool(), id).await?;
    if !report.is_consistent {
        tracing::warn!(item_id = id, drift = report.drift, "Stock ledger drift detected");
    }
    Ok(Json(report))
}

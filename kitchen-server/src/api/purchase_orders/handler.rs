//! Purchase Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::AppResult;
use shared::models::{
    PurchaseOrder, PurchaseOrderCreate, PurchaseOrderDetail, PurchaseOrderQuery,
    PurchaseOrderStatusUpdate,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::purchase_order;
use crate::utils::money;
use crate::utils::validation::{ValidatedJson, validate_optional_date};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PurchaseOrderQuery>,
) -> AppResult<Json<Vec<PurchaseOrder>>> {
    let orders = purchase_order::find_all(state.pool(), &query).await?;
    Ok(Json(orders))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PurchaseOrderDetail>> {
    let detail = purchase_order::get_detail(state.pool(), id).await?;
    Ok(Json(detail))
}

pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ValidatedJson(payload): ValidatedJson<PurchaseOrderCreate>,
) -> AppResult<Json<PurchaseOrderDetail>> {
    validate_optional_date(&payload.expected_date, "expected_date")?;
    for line in &payload.lines {
        money::validate_stock_quantity(line.quantity, "quantity")?;
        money::validate_amount(line.unit_cost, "unit_cost")?;
    }

    let detail = purchase_order::create(state.pool(), payload, Some(current.id)).await?;
    tracing::info!(
        purchase_order_id = detail.purchase_order.id,
        po_number = %detail.purchase_order.po_number,
        total = detail.purchase_order.total_amount,
        "Purchase order created"
    );
    Ok(Json(detail))
}

pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PurchaseOrderStatusUpdate>,
) -> AppResult<Json<PurchaseOrderDetail>> {
    let detail = purchase_order::update_status(state.pool(), id, payload.status).await?;
    Ok(Json(detail))
}

/// Book all lines into stock and mark the order received
pub async fn receive(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PurchaseOrderDetail>> {
    let detail = purchase_order::receive(state.pool(), id, Some(current.id)).await?;
    tracing::info!(
        purchase_order_id = id,
        lines = detail.lines.len(),
        user_id = current.id,
        "Purchase order received"
    );
    Ok(Json(detail))
}

pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    purchase_order::delete(state.pool(), id).await?;
    Ok(Json(true))
}

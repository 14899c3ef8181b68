//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::AppResult;
use shared::models::{
    OrderAssign, OrderCreate, OrderDetail, OrderQuery, OrderStatusUpdate, OrderUpdate,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::validation::{MAX_NAME_LEN, ValidatedJson, validate_required_text};

/// Orders, newest first (`?status=&limit=&offset=`)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let orders = order::find_all(state.pool(), &query).await?;
    Ok(Json(orders))
}

/// Kitchen queue: pending, cooking and out for delivery, oldest first
pub async fn active(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderDetail>>> {
    let orders = order::find_active(state.pool()).await?;
    Ok(Json(orders))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order::get_detail(state.pool(), id).await?;
    Ok(Json(detail))
}

pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ValidatedJson(payload): ValidatedJson<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    validate_required_text(&payload.customer_name, "customer_name", MAX_NAME_LEN)?;

    let detail = order::create(state.pool(), payload).await?;
    tracing::info!(
        order_id = detail.order.id,
        order_number = %detail.order.order_number,
        user_id = current.id,
        "Order placed"
    );
    Ok(Json(detail))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<OrderUpdate>,
) -> AppResult<Json<OrderDetail>> {
    if let Some(name) = &payload.customer_name {
        validate_required_text(name, "customer_name", MAX_NAME_LEN)?;
    }
    let detail = order::update(state.pool(), id, payload).await?;
    Ok(Json(detail))
}

/// Single-field status change, guarded by the order lifecycle
pub async fn update_status(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order::update_status(state.pool(), id, payload.status).await?;
    tracing::debug!(order_id = id, user_id = current.id, status = payload.status.as_str(), "Status update applied");
    Ok(Json(detail))
}

pub async fn assign(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderAssign>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order::assign(state.pool(), id, payload.staff_id).await?;
    Ok(Json(detail))
}

pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    order::delete(state.pool(), id).await?;
    tracing::info!(order_id = id, "Order deleted");
    Ok(Json(true))
}

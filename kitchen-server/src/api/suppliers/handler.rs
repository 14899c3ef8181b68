//! Supplier API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::AppResult;
use shared::models::{Supplier, SupplierCreate, SupplierUpdate};

use crate::core::ServerState;
use crate::db::repository::supplier;
use crate::utils::validation::{MAX_NAME_LEN, ValidatedJson, validate_required_text};

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Supplier>>> {
    let suppliers = supplier::find_all(state.pool()).await?;
    Ok(Json(suppliers))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Supplier>> {
    let found = supplier::get(state.pool(), id).await?;
    Ok(Json(found))
}

pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<SupplierCreate>,
) -> AppResult<Json<Supplier>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let created = supplier::create(state.pool(), payload).await?;
    tracing::info!(supplier_id = created.id, name = %created.name, "Supplier created");
    Ok(Json(created))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<SupplierUpdate>,
) -> AppResult<Json<Supplier>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let updated = supplier::update(state.pool(), id, payload).await?;
    Ok(Json(updated))
}

pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    supplier::delete(state.pool(), id).await?;
    tracing::info!(supplier_id = id, "Supplier deleted");
    Ok(Json(true))
}

//! Payroll API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::AppResult;
use shared::models::{PayrollEntry, PayrollEntryCreate, PayrollQuery};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::payroll;
use crate::utils::money;
use crate::utils::validation::ValidatedJson;

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PayrollQuery>,
) -> AppResult<Json<Vec<PayrollEntry>>> {
    let entries = payroll::find_all(state.pool(), &query).await?;
    Ok(Json(entries))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PayrollEntry>> {
    let entry = payroll::get(state.pool(), id).await?;
    Ok(Json(entry))
}

/// Compute gross and net pay for a period
pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<PayrollEntryCreate>,
) -> AppResult<Json<PayrollEntry>> {
    money::require_finite(payload.hours_worked, "hours_worked")?;
    let entry = payroll::create(state.pool(), payload).await?;
    tracing::info!(
        payroll_id = entry.id,
        staff_id = entry.staff_id,
        net_pay = entry.net_pay,
        "Payroll entry created"
    );
    Ok(Json(entry))
}

pub async fn pay(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PayrollEntry>> {
    let entry = payroll::pay(state.pool(), id).await?;
    tracing::info!(payroll_id = id, net_pay = entry.net_pay, paid_by = current.id, "Payroll entry paid");
    Ok(Json(entry))
}

pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    payroll::delete(state.pool(), id).await?;
    Ok(Json(true))
}

//! Staff API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::AppResult;
use shared::models::{Staff, StaffCreate, StaffUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::staff;
use crate::utils::money;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, ValidatedJson, validate_optional_date,
    validate_required_text,
};

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Staff>>> {
    let members = staff::find_all(state.pool()).await?;
    Ok(Json(members))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Staff>> {
    let member = staff::get(state.pool(), id).await?;
    Ok(Json(member))
}

/// Create the login account and the staff profile together
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ValidatedJson(payload): ValidatedJson<StaffCreate>,
) -> AppResult<Json<Staff>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.position, "position", MAX_SHORT_TEXT_LEN)?;
    validate_optional_date(&payload.hire_date, "hire_date")?;
    money::validate_amount(payload.hourly_rate, "hourly_rate")?;

    let member = staff::create(state.pool(), payload).await?;
    tracing::info!(
        staff_id = member.id,
        email = %member.email,
        role = member.role.as_str(),
        created_by = current.id,
        "Staff member created"
    );
    Ok(Json(member))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<StaffUpdate>,
) -> AppResult<Json<Staff>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_date(&payload.hire_date, "hire_date")?;
    if let Some(rate) = payload.hourly_rate {
        money::validate_amount(rate, "hourly_rate")?;
    }

    let member = staff::update(state.pool(), id, payload).await?;
    Ok(Json(member))
}

/// Remove the profile and its login account
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    staff::delete(state.pool(), id, current.id).await?;
    tracing::info!(staff_id = id, deleted_by = current.id, "Staff member deleted");
    Ok(Json(true))
}

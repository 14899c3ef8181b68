//! Recipe API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{AppError, AppResult};
use shared::models::{Recipe, RecipeCreate, RecipeDetail, RecipeQuery, RecipeUpdate};

use crate::core::ServerState;
use crate::db::repository::recipe;
use crate::utils::money;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, ValidatedJson, validate_required_text,
};

/// Instructions are free text steps; each must be non-blank
fn validate_instructions(steps: &[String]) -> Result<(), AppError> {
    for (i, step) in steps.iter().enumerate() {
        validate_required_text(step, &format!("instructions[{i}]"), MAX_NOTE_LEN)?;
    }
    Ok(())
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<RecipeQuery>,
) -> AppResult<Json<Vec<Recipe>>> {
    let recipes = recipe::find_all(state.pool(), &query).await?;
    Ok(Json(recipes))
}

/// Recipe with ingredients and ingredient cost
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RecipeDetail>> {
    let detail = recipe::get_detail(state.pool(), id).await?;
    Ok(Json(detail))
}

pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<RecipeCreate>,
) -> AppResult<Json<RecipeDetail>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_instructions(&payload.instructions)?;
    money::validate_amount(payload.price, "price")?;

    let detail = recipe::create(state.pool(), payload).await?;
    tracing::info!(recipe_id = detail.recipe.id, name = %detail.recipe.name, "Recipe created");
    Ok(Json(detail))
}

/// A present `ingredients` list replaces the current one
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RecipeUpdate>,
) -> AppResult<Json<RecipeDetail>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(steps) = &payload.instructions {
        validate_instructions(steps)?;
    }
    if let Some(price) = payload.price {
        money::validate_amount(price, "price")?;
    }

    let detail = recipe::update(state.pool(), id, payload).await?;
    Ok(Json(detail))
}

pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    recipe::delete(state.pool(), id).await?;
    tracing::info!(recipe_id = id, "Recipe deleted");
    Ok(Json(true))
}

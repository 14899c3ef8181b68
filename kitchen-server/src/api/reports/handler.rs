//! Report API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use shared::error::AppResult;
use shared::models::{DashboardStats, InventoryValuation, SalesQuery, SalesReport};

use crate::core::ServerState;
use crate::db::repository::report;

pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    let stats = report::dashboard(state.pool()).await?;
    Ok(Json(stats))
}

pub async fn inventory_valuation(
    State(state): State<ServerState>,
) -> AppResult<Json<InventoryValuation>> {
    let valuation = report::inventory_valuation(state.pool()).await?;
    Ok(Json(valuation))
}

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both inclusive
pub async fn sales(
    State(state): State<ServerState>,
    Query(query): Query<SalesQuery>,
) -> AppResult<Json<SalesReport>> {
    let report = report::sales(state.pool(), &query).await?;
    Ok(Json(report))
}

//! Report API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::REPORTS_VIEW;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route("/inventory-valuation", get(handler::inventory_valuation))
        .route("/sales", get(handler::sales))
        .layer(middleware::from_fn(require_permission(REPORTS_VIEW)))
}

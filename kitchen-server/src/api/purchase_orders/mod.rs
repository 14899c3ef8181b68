//! Purchase Order API Module
//!
//! Every route requires `purchase_orders:manage`.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::permissions::PURCHASE_ORDERS_MANAGE;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/purchase-orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/receive", post(handler::receive))
        .layer(middleware::from_fn(require_permission(PURCHASE_ORDERS_MANAGE)))
}

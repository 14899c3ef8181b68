//! Inventory API Module
//!
//! Items and their stock ledger. Reads need a login, item maintenance
//! needs `inventory:manage`, booking movements needs `stock:move`.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::permissions::{INVENTORY_MANAGE, STOCK_MOVE};
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/low-stock", get(handler::low_stock))
        .route("/movement-reasons", get(handler::movement_reasons))
        .route("/movements", get(handler::list_movements))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/movements", get(handler::item_movements))
        .route("/{id}/reconcile", get(handler::reconcile));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_permission(INVENTORY_MANAGE)));

    let stock_routes = Router::new()
        .route("/{id}/movements", post(handler::record_movement))
        .layer(middleware::from_fn(require_permission(STOCK_MOVE)));

    read_routes.merge(manage_routes).merge(stock_routes)
}

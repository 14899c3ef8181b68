//! Order API Module
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/orders | GET | login |
//! | /api/orders/active | GET | login |
//! | /api/orders/{id} | GET | login |
//! | /api/orders | POST | orders:create |
//! | /api/orders/{id}/status | PATCH | orders:status |
//! | /api/orders/{id} | PUT, DELETE | orders:manage |
//! | /api/orders/{id}/assign | PATCH | orders:manage |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::permissions::{ORDERS_CREATE, ORDERS_MANAGE, ORDERS_STATUS};
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/active", get(handler::active))
        .route("/{id}", get(handler::get_by_id));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_permission(ORDERS_CREATE)));

    let status_routes = Router::new()
        .route("/{id}/status", patch(handler::update_status))
        .layer(middleware::from_fn(require_permission(ORDERS_STATUS)));

    let manage_routes = Router::new()
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route("/{id}/assign", patch(handler::assign))
        .layer(middleware::from_fn(require_permission(ORDERS_MANAGE)));

    read_routes
        .merge(create_routes)
        .merge(status_routes)
        .merge(manage_routes)
}

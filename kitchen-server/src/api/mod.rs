//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness check (public)
//! - [`auth`] - login, current user, password change
//! - [`inventory`] - items and the stock ledger
//! - [`recipes`] - menu recipes and ingredients
//! - [`orders`] - customer orders and the kitchen queue
//! - [`staff`] - staff accounts (admin)
//! - [`suppliers`] - suppliers
//! - [`purchase_orders`] - supplier restock orders
//! - [`payroll`] - payroll entries (admin)
//! - [`reports`] - dashboard and reports

pub mod auth;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod payroll;
pub mod purchase_orders;
pub mod recipes;
pub mod reports;
pub mod staff;
pub mod suppliers;

use std::path::Path;
use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::any;
use http::HeaderValue;
use shared::error::{AppError, ErrorCode};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::ServerState;
use crate::middleware::logging_middleware;

/// UUID v4 request ids
#[derive(Clone, Default)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Unmatched `/api/*` paths answer with a JSON 404 instead of the SPA
async fn api_not_found() -> AppError {
    AppError::with_message(ErrorCode::NotFound, "API route not found")
}

/// All routes, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(inventory::router())
        .merge(recipes::router())
        .merge(orders::router())
        .merge(staff::router())
        .merge(suppliers::router())
        .merge(purchase_orders::router())
        .merge(payroll::router())
        .merge(reports::router())
        .route("/api/{*path}", any(api_not_found))
}

/// Fully configured application, used by the server and by router tests
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    let static_dir = state.config.static_dir.clone();

    let mut app = build_router()
        // innermost: sees the matched route and the authenticated user
        .layer(axum_middleware::from_fn(logging_middleware))
        // skips public routes, injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .with_state(state);

    if let Some(dir) = static_dir {
        let index = Path::new(&dir).join("index.html");
        tracing::info!(static_dir = %dir, "Serving dashboard SPA");
        app = app.fallback_service(ServeDir::new(&dir).fallback(ServeFile::new(index)));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(XRequestId))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::new(timeout)),
    )
}

//! Request logging middleware
//!
//! One line when a request starts and one when it completes, keyed by the
//! `x-request-id` set by the request id layer.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

use crate::auth::CurrentUser;

/// Logs:
/// - request id (`x-request-id`)
/// - method and matched route
/// - authenticated user, when present
/// - response status and latency in milliseconds
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let user = req
        .extensions()
        .get::<CurrentUser>()
        .map(|u| format!("{}({})", u.email, u.id));

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        user = ?user,
        "Request started"
    );

    let response = next.run(req).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(request_id = %request_id, method = %method, path = %path, status, latency_ms, user = ?user, "Request failed");
    } else if response.status().is_client_error() {
        warn!(request_id = %request_id, method = %method, path = %path, status, latency_ms, user = ?user, "Request rejected");
    } else {
        info!(request_id = %request_id, method = %method, path = %path, status, latency_ms, user = ?user, "Request completed");
    }

    response
}

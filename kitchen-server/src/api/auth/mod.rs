//! Authentication Routes
//!
//! - `POST /api/auth/login`: public
//! - `GET /api/auth/me`, `POST /api/auth/change-password`: logged-in user

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/change-password", post(handler::change_password))
}

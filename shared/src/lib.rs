//! Shared types for the kitchen manager
//!
//! Domain models, API DTOs and the unified error system used by
//! kitchen-server and Rust API clients.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};

//! Kitchen Server - restaurant kitchen management backend
//!
//! # Module layout
//!
//! ```text
//! kitchen-server/src/
//! ├── core/          # config, state, server lifecycle
//! ├── auth/          # JWT, Argon2 passwords, role permissions
//! ├── api/           # HTTP routes and handlers
//! ├── middleware/    # request logging
//! ├── db/            # SQLite pool, migrations, repositories
//! └── utils/         # logging setup, validation, money math
//! ```
//!
//! Stock levels only change through the stock movement ledger
//! (`db::repository::stock_movement`); every other write path that touches
//! stock (item creation, purchase order receipt) books a movement.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use shared::error::{AppError, AppResult, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Security event log, written to the `security` target
///
/// ```ignore
/// security_log!(WARN, "login_failed", email = %email);
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(target: "security", event = $event, $($arg)*)
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(target: "security", event = $event, $($arg)*)
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(target: "security", event = $event, $($arg)*)
    };
}

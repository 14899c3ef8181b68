//! Server core: configuration, state and lifecycle
//!
//! - [`Config`]: environment configuration
//! - [`ServerState`]: state shared by all handlers
//! - [`Server`]: HTTP server
//! - [`ServerError`]: startup errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;

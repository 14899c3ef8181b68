//! Data models
//!
//! Shared between kitchen-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflake ids, all timestamps Unix millis.

pub mod inventory;
pub mod order;
pub mod payroll;
pub mod purchase_order;
pub mod recipe;
pub mod report;
pub mod staff;
pub mod stock_movement;
pub mod supplier;

// Re-exports
pub use inventory::*;
pub use order::*;
pub use payroll::*;
pub use purchase_order::*;
pub use recipe::*;
pub use report::*;
pub use staff::*;
pub use stock_movement::*;
pub use supplier::*;

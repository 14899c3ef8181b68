//! Unified error system
//!
//! - [`ErrorCode`]: standardized numeric codes
//! - [`ErrorCategory`]: classification of codes by domain
//! - [`AppError`]: error with code, message and details
//! - [`ApiResponse`]: response envelope used for error bodies
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Inventory errors
//! - 4xxx: Order errors
//! - 5xxx: Supplier and purchasing errors
//! - 6xxx: Recipe errors
//! - 7xxx: Payroll errors
//! - 8xxx: Staff errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::InventoryItemNotFound);
//! let err = AppError::validation("quantity must be positive")
//!     .with_detail("field", "quantity");
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(2));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};

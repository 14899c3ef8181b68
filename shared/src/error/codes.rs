//! Unified error codes for the kitchen manager
//!
//! Error codes are organized by category:
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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the dashboard can switch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Operation conflicts with current resource state
    Conflict = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 3xxx: Inventory ====================
    /// Inventory item not found
    InventoryItemNotFound = 3001,
    /// Inventory item name already exists
    InventoryItemNameExists = 3002,
    /// Stock quantity not positive or above the allowed maximum
    InvalidStockQuantity = 3003,
    /// Inventory item still has stock movement history
    InventoryItemHasMovements = 3004,
    /// Inventory item is referenced by recipes or purchase orders
    InventoryItemInUse = 3005,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Order status transition not allowed
    InvalidStatusTransition = 4003,
    /// Order item price missing and recipe has no price
    OrderItemPriceMissing = 4004,

    // ==================== 5xxx: Supplier ====================
    /// Supplier not found
    SupplierNotFound = 5001,
    /// Supplier name already exists
    SupplierNameExists = 5002,
    /// Supplier still has purchase orders
    SupplierHasPurchaseOrders = 5003,
    /// Purchase order not found
    PurchaseOrderNotFound = 5101,
    /// Purchase order cannot be received in its current status
    PurchaseOrderNotReceivable = 5102,
    /// Purchase order has no lines
    PurchaseOrderEmpty = 5103,

    // ==================== 6xxx: Recipe ====================
    /// Recipe not found
    RecipeNotFound = 6001,
    /// Recipe name already exists
    RecipeNameExists = 6002,
    /// Recipe is referenced by orders
    RecipeInUse = 6003,

    // ==================== 7xxx: Payroll ====================
    /// Payroll entry not found
    PayrollEntryNotFound = 7001,
    /// Payroll entry already paid
    PayrollAlreadyPaid = 7002,
    /// Payroll period is invalid
    PayrollPeriodInvalid = 7003,

    // ==================== 8xxx: Staff ====================
    /// Staff member not found
    StaffNotFound = 8001,
    /// Email already registered
    EmailExists = 8002,
    /// Cannot delete own account
    CannotDeleteSelf = 8003,
    /// Staff member has paid payroll entries
    StaffHasPaidPayroll = 8004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::Conflict => "Operation conflicts with current state",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Invalid token",
            ErrorCode::AccountDisabled => "Account has been disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",

            // Inventory
            ErrorCode::InventoryItemNotFound => "Inventory item not found",
            ErrorCode::InventoryItemNameExists => "Inventory item name already exists",
            ErrorCode::InvalidStockQuantity => "Stock quantity is out of range",
            ErrorCode::InventoryItemHasMovements => "Inventory item has stock movement history",
            ErrorCode::InventoryItemInUse => "Inventory item is in use",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::InvalidStatusTransition => "Order status transition not allowed",
            ErrorCode::OrderItemPriceMissing => "Order item has no price",

            // Supplier
            ErrorCode::SupplierNotFound => "Supplier not found",
            ErrorCode::SupplierNameExists => "Supplier name already exists",
            ErrorCode::SupplierHasPurchaseOrders => "Supplier has purchase orders",
            ErrorCode::PurchaseOrderNotFound => "Purchase order not found",
            ErrorCode::PurchaseOrderNotReceivable => "Purchase order cannot be received",
            ErrorCode::PurchaseOrderEmpty => "Purchase order has no lines",

            // Recipe
            ErrorCode::RecipeNotFound => "Recipe not found",
            ErrorCode::RecipeNameExists => "Recipe name already exists",
            ErrorCode::RecipeInUse => "Recipe is referenced by orders",

            // Payroll
            ErrorCode::PayrollEntryNotFound => "Payroll entry not found",
            ErrorCode::PayrollAlreadyPaid => "Payroll entry already paid",
            ErrorCode::PayrollPeriodInvalid => "Payroll period is invalid",

            // Staff
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::EmailExists => "Email already registered",
            ErrorCode::CannotDeleteSelf => "Cannot delete own account",
            ErrorCode::StaffHasPaidPayroll => "Staff member has paid payroll entries",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            9 => Ok(ErrorCode::Conflict),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // Inventory
            3001 => Ok(ErrorCode::InventoryItemNotFound),
            3002 => Ok(ErrorCode::InventoryItemNameExists),
            3003 => Ok(ErrorCode::InvalidStockQuantity),
            3004 => Ok(ErrorCode::InventoryItemHasMovements),
            3005 => Ok(ErrorCode::InventoryItemInUse),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::InvalidStatusTransition),
            4004 => Ok(ErrorCode::OrderItemPriceMissing),

            // Supplier
            5001 => Ok(ErrorCode::SupplierNotFound),
            5002 => Ok(ErrorCode::SupplierNameExists),
            5003 => Ok(ErrorCode::SupplierHasPurchaseOrders),
            5101 => Ok(ErrorCode::PurchaseOrderNotFound),
            5102 => Ok(ErrorCode::PurchaseOrderNotReceivable),
            5103 => Ok(ErrorCode::PurchaseOrderEmpty),

            // Recipe
            6001 => Ok(ErrorCode::RecipeNotFound),
            6002 => Ok(ErrorCode::RecipeNameExists),
            6003 => Ok(ErrorCode::RecipeInUse),

            // Payroll
            7001 => Ok(ErrorCode::PayrollEntryNotFound),
            7002 => Ok(ErrorCode::PayrollAlreadyPaid),
            7003 => Ok(ErrorCode::PayrollPeriodInvalid),

            // Staff
            8001 => Ok(ErrorCode::StaffNotFound),
            8002 => Ok(ErrorCode::EmailExists),
            8003 => Ok(ErrorCode::CannotDeleteSelf),
            8004 => Ok(ErrorCode::StaffHasPaidPayroll),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::Conflict.code(), 9);

        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);

        assert_eq!(ErrorCode::InventoryItemNotFound.code(), 3001);
        assert_eq!(ErrorCode::InvalidStockQuantity.code(), 3003);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::InvalidStatusTransition.code(), 4003);
        assert_eq!(ErrorCode::SupplierNotFound.code(), 5001);
        assert_eq!(ErrorCode::PurchaseOrderNotFound.code(), 5101);
        assert_eq!(ErrorCode::RecipeNotFound.code(), 6001);
        assert_eq!(ErrorCode::PayrollEntryNotFound.code(), 7001);
        assert_eq!(ErrorCode::StaffNotFound.code(), 8001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(3004), Ok(ErrorCode::InventoryItemHasMovements));
        assert_eq!(ErrorCode::try_from(5102), Ok(ErrorCode::PurchaseOrderNotReceivable));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::DatabaseError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(9999), Err(InvalidErrorCode(9999)));
        assert_eq!(ErrorCode::try_from(3999), Err(InvalidErrorCode(3999)));
        // retired codes stay unassigned
        for retired in [1, 6, 7, 8, 1006, 9004, 9005] {
            assert_eq!(ErrorCode::try_from(retired), Err(InvalidErrorCode(retired)));
        }
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");

        let code: ErrorCode = serde_json::from_str("8002").unwrap();
        assert_eq!(code, ErrorCode::EmailExists);

        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::RecipeNotFound), "6001");
        assert_eq!(
            format!("{}", InvalidErrorCode(42)),
            "invalid error code: 42"
        );
    }
}

//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Inventory errors
/// - 4xxx: Order errors
/// - 5xxx: Supplier and purchasing errors
/// - 6xxx: Recipe errors
/// - 7xxx: Payroll errors
/// - 8xxx: Staff errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Inventory,
    Order,
    Supplier,
    Recipe,
    Payroll,
    Staff,
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Inventory,
            4000..5000 => Self::Order,
            5000..6000 => Self::Supplier,
            6000..7000 => Self::Recipe,
            7000..8000 => Self::Payroll,
            8000..9000 => Self::Staff,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Inventory => "inventory",
            Self::Order => "order",
            Self::Supplier => "supplier",
            Self::Recipe => "recipe",
            Self::Payroll => "payroll",
            Self::Staff => "staff",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Inventory);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(5101), ErrorCategory::Supplier);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Recipe);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Payroll);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::Staff);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(
            ErrorCode::InvalidStockQuantity.category(),
            ErrorCategory::Inventory
        );
        assert_eq!(
            ErrorCode::PurchaseOrderNotReceivable.category(),
            ErrorCategory::Supplier
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Inventory).unwrap();
        assert_eq!(json, "\"inventory\"");

        let category: ErrorCategory = serde_json::from_str("\"payroll\"").unwrap();
        assert_eq!(category, ErrorCategory::Payroll);
        assert_eq!(category.name(), "payroll");
    }
}

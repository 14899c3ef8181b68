//! Stock Movement Model (append-only inventory ledger)

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum MovementType {
    In,
    Out,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Reason suggestions offered by the dashboard
pub const MOVEMENT_REASONS: &[&str] = &[
    "Purchase",
    "Supplier delivery",
    "Return from kitchen",
    "Inventory adjustment",
    "Used in cooking",
    "Spoilage",
    "Expired",
    "Damaged",
    "Transfer",
    "Staff meal",
];

/// Reason recorded when an item is created with stock on hand
pub const INITIAL_STOCK_REASON: &str = "Initial stock";

/// Reason recorded for purchase order receipts
pub const PURCHASE_RECEIVED_REASON: &str = "Purchase order received";

/// Stock movement row. Never updated or deleted after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: i64,
    pub inventory_item_id: i64,
    pub item_name: String,
    pub movement_type: MovementType,
    /// Requested quantity
    pub quantity: f64,
    /// Change actually applied to the balance. Below `quantity` when an
    /// `out` is clamped at zero.
    pub applied_quantity: f64,
    pub reason: String,
    pub reference_number: Option<String>,
    pub unit_cost: f64,
    /// quantity × unit_cost for `in`, 0 for `out`
    pub total_cost: f64,
    /// Item balance right after this movement
    pub balance_after: f64,
    pub performed_by: Option<i64>,
    /// User name at booking time, kept after the user is deleted
    pub performed_by_name: Option<String>,
    pub notes: Option<String>,
    pub movement_date: i64,
    pub created_at: i64,
}

/// Record stock movement payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StockMovementCreate {
    pub movement_type: MovementType,
    #[validate(range(exclusive_min = 0.0, max = 1_000_000_000.0))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 200))]
    pub reason: String,
    #[validate(length(max = 100))]
    pub reference_number: Option<String>,
    #[validate(range(min = 0.0))]
    pub unit_cost: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    /// Defaults to now
    pub movement_date: Option<i64>,
    /// Let an `out` movement take the balance below zero
    #[serde(default)]
    pub allow_negative: bool,
}

/// Ledger filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementQuery {
    pub movement_type: Option<MovementType>,
    /// Inclusive lower bound on movement_date (millis)
    pub from: Option<i64>,
    /// Inclusive upper bound on movement_date (millis)
    pub to: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Ledger reconciliation for one item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerReconciliation {
    pub inventory_item_id: i64,
    /// Σ applied quantity of `in` movements
    pub total_in: f64,
    /// Σ applied quantity of `out` movements
    pub total_out: f64,
    pub movement_count: i64,
    /// balance_after of the latest movement, if any
    pub ledger_balance: Option<f64>,
    pub current_stock: f64,
    /// current_stock minus (total_in - total_out), 0 when consistent
    pub drift: f64,
    /// No drift and the latest balance_after matches current_stock
    pub is_consistent: bool,
}

//! Purchase Order Model (supplier-facing restock order)

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Purchase order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PurchaseOrderStatus {
    Draft,
    Ordered,
    Received,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Ordered => "ordered",
            Self::Received => "received",
            Self::Cancelled => "cancelled",
        }
    }

    /// Stock can be booked in from draft or ordered
    pub fn is_receivable(&self) -> bool {
        matches!(self, Self::Draft | Self::Ordered)
    }

    /// Transitions allowed through PATCH status. `received` goes through
    /// the receive endpoint only.
    pub fn can_transition_to(&self, next: PurchaseOrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Ordered)
                | (Self::Draft, Self::Cancelled)
                | (Self::Ordered, Self::Cancelled)
        )
    }
}

/// Purchase order entity (joined with supplier name)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PurchaseOrder {
    pub id: i64,
    /// PO-YYYYMMDD-NNNN
    pub po_number: String,
    pub supplier_id: i64,
    pub supplier_name: String,
    pub status: PurchaseOrderStatus,
    pub total_amount: f64,
    /// YYYY-MM-DD
    pub expected_date: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub received_at: Option<i64>,
}

/// Purchase order line joined with the item name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PurchaseOrderLine {
    pub id: i64,
    pub purchase_order_id: i64,
    pub inventory_item_id: i64,
    pub item_name: String,
    pub quantity: f64,
    pub unit_cost: f64,
}

/// Purchase order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderDetail {
    #[serde(flatten)]
    pub purchase_order: PurchaseOrder,
    pub lines: Vec<PurchaseOrderLine>,
}

/// Line input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PurchaseOrderLineInput {
    pub inventory_item_id: i64,
    #[validate(range(exclusive_min = 0.0, max = 1_000_000_000.0))]
    pub quantity: f64,
    #[validate(range(min = 0.0))]
    pub unit_cost: f64,
}

/// Create purchase order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PurchaseOrderCreate {
    pub supplier_id: i64,
    #[validate(length(min = 1), nested)]
    pub lines: Vec<PurchaseOrderLineInput>,
    pub expected_date: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// PATCH status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderStatusUpdate {
    pub status: PurchaseOrderStatus,
}

/// Purchase order list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseOrderQuery {
    pub status: Option<PurchaseOrderStatus>,
    pub supplier_id: Option<i64>,
}

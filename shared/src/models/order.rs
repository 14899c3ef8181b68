//! Customer Order Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order lifecycle status
///
/// `pending → cooking → out_for_delivery → delivered`, with `cancelled`
/// reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    Pending,
    Cooking,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ACTIVE: [OrderStatus; 3] = [Self::Pending, Self::Cooking, Self::OutForDelivery];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Cooking => "cooking",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Live orders move freely between states, including backwards and
    /// skips such as `pending -> delivered`. Terminal states never move.
    pub fn can_transition_to(&self, _next: OrderStatus) -> bool {
        !self.is_terminal()
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// ORD-YYYYMMDD-NNNN
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub total_amount: f64,
    /// User id of the assigned staff member
    pub assigned_staff: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub delivered_at: Option<i64>,
}

/// Order line joined with the recipe name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub recipe_id: i64,
    pub recipe_name: String,
    pub quantity: i32,
    /// Unit price at order time
    pub price: f64,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Order line input (missing price falls back to the recipe's menu price)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    pub recipe_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(length(max = 100))]
    pub customer_phone: Option<String>,
    #[validate(length(max = 500))]
    pub customer_address: Option<String>,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItemInput>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub assigned_staff: Option<i64>,
}

/// Update order payload. `items` may only be replaced while pending.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderUpdate {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: Option<String>,
    #[validate(length(max = 100))]
    pub customer_phone: Option<String>,
    #[validate(length(max = 500))]
    pub customer_address: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    #[validate(length(min = 1), nested)]
    pub items: Option<Vec<OrderItemInput>>,
}

/// PATCH status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// PATCH assign payload (`null` clears the assignment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAssign {
    pub staff_id: Option<i64>,
}

/// Order list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

//! Inventory Item Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Inventory category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum InventoryCategory {
    Vegetables,
    Meat,
    Seafood,
    Dairy,
    Grains,
    Spices,
    Beverages,
    #[default]
    Other,
}

impl InventoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vegetables => "vegetables",
            Self::Meat => "meat",
            Self::Seafood => "seafood",
            Self::Dairy => "dairy",
            Self::Grains => "grains",
            Self::Spices => "spices",
            Self::Beverages => "beverages",
            Self::Other => "other",
        }
    }
}

/// Inventory item entity
///
/// `current_stock` only changes through stock movements.
/// `is_low_stock` is computed by the query (`current_stock <= min_stock`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub category: InventoryCategory,
    pub current_stock: f64,
    pub unit: String,
    pub min_stock: f64,
    pub max_stock: f64,
    pub cost_per_unit: f64,
    /// Supplier name (free reference, not a foreign key)
    pub supplier: Option<String>,
    pub last_restocked: Option<i64>,
    /// YYYY-MM-DD
    pub expiry_date: Option<String>,
    pub is_low_stock: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create inventory item payload
///
/// A positive `current_stock` is booked as an "Initial stock" movement.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InventoryItemCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub category: InventoryCategory,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1_000_000_000.0))]
    pub current_stock: f64,
    #[validate(length(min = 1, max = 100))]
    pub unit: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub min_stock: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub max_stock: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub cost_per_unit: f64,
    #[validate(length(max = 200))]
    pub supplier: Option<String>,
    pub expiry_date: Option<String>,
}

/// Update inventory item payload (stock level is not editable here)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct InventoryItemUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub category: Option<InventoryCategory>,
    #[validate(length(min = 1, max = 100))]
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub min_stock: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_stock: Option<f64>,
    #[validate(range(min = 0.0))]
    pub cost_per_unit: Option<f64>,
    #[validate(length(max = 200))]
    pub supplier: Option<String>,
    pub expiry_date: Option<String>,
}

/// Inventory list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryQuery {
    pub category: Option<InventoryCategory>,
    /// Case-insensitive name substring
    pub search: Option<String>,
}

/// Delete options (`?force=true` removes movement history too)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub force: bool,
}

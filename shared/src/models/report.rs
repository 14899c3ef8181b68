//! Report Models

use serde::{Deserialize, Serialize};

/// Dashboard counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_items: i64,
    pub low_stock_items: i64,
    pub active_orders: i64,
    pub today_orders: i64,
    /// Revenue of orders delivered today (UTC)
    pub today_revenue: f64,
    pub staff_count: i64,
    pub supplier_count: i64,
    pub inventory_value: f64,
}

/// Stock value of one inventory category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryValuation {
    pub category: String,
    pub item_count: i64,
    pub total_value: f64,
}

/// Σ current_stock × cost_per_unit, grouped by category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryValuation {
    pub total_value: f64,
    pub categories: Vec<CategoryValuation>,
}

/// Order count per status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Best-selling recipe in a period
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopRecipe {
    pub recipe_id: i64,
    pub recipe_name: String,
    pub quantity: i64,
    pub revenue: f64,
}

/// Sales report for a date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    /// YYYY-MM-DD, inclusive
    pub from: String,
    /// YYYY-MM-DD, inclusive
    pub to: String,
    pub total_orders: i64,
    pub delivered_orders: i64,
    /// Revenue of delivered orders
    pub revenue: f64,
    pub average_order_value: f64,
    pub status_counts: Vec<StatusCount>,
    pub top_recipes: Vec<TopRecipe>,
}

/// Sales report range (defaults to the last 30 days)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

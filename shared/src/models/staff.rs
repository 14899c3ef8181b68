//! User & Staff Models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum UserRole {
    Admin,
    KitchenStaff,
    InventoryManager,
    DeliveryStaff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::KitchenStaff => "kitchen_staff",
            Self::InventoryManager => "inventory_manager",
            Self::DeliveryStaff => "delivery_staff",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account row (password hash never serialized)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// Staff view: user joined with staff_member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Staff {
    /// staff_member id
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub position: String,
    pub hourly_rate: f64,
    /// YYYY-MM-DD
    pub hire_date: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create staff payload (creates the user account too)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StaffCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: UserRole,
    #[validate(length(max = 100))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub position: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub hourly_rate: f64,
    pub hire_date: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Update staff payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StaffUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    /// Resets the password when present
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
    #[validate(length(max = 100))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub position: Option<String>,
    #[validate(range(min = 0.0))]
    pub hourly_rate: Option<f64>,
    pub hire_date: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

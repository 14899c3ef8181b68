//! Supplier Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Supplier entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Inventory categories this supplier delivers
    #[cfg_attr(feature = "db", sqlx(json))]
    pub categories: Vec<String>,
    /// 1-5
    pub rating: Option<i32>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create supplier payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SupplierCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub contact_person: Option<String>,
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    pub is_active: Option<bool>,
}

/// Update supplier payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SupplierUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub contact_person: Option<String>,
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub categories: Option<Vec<String>>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    pub is_active: Option<bool>,
}

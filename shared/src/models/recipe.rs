//! Recipe / Menu Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Recipe entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    /// Minutes
    pub prep_time: i32,
    /// Minutes
    pub cook_time: i32,
    pub servings: i32,
    /// Menu price
    pub price: f64,
    /// Ordered preparation steps
    #[cfg_attr(feature = "db", sqlx(json))]
    pub instructions: Vec<String>,
    pub image_url: Option<String>,
    pub calories: Option<i32>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Recipe ingredient joined with its inventory item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RecipeIngredient {
    pub inventory_item_id: i64,
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub cost_per_unit: f64,
}

/// Ingredient input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecipeIngredientInput {
    pub inventory_item_id: i64,
    #[validate(range(exclusive_min = 0.0))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 100))]
    pub unit: String,
}

/// Recipe with ingredients and derived cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredient>,
    /// Σ ingredient quantity × item cost_per_unit
    pub ingredient_cost: f64,
}

/// Create recipe payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecipeCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub prep_time: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub cook_time: i32,
    #[validate(range(min = 1))]
    pub servings: i32,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(nested)]
    pub ingredients: Vec<RecipeIngredientInput>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(range(min = 0))]
    pub calories: Option<i32>,
    pub is_active: Option<bool>,
}

/// Update recipe payload (`ingredients` replaces the full list when present)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RecipeUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub prep_time: Option<i32>,
    #[validate(range(min = 0))]
    pub cook_time: Option<i32>,
    #[validate(range(min = 1))]
    pub servings: Option<i32>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(nested)]
    pub ingredients: Option<Vec<RecipeIngredientInput>>,
    pub instructions: Option<Vec<String>>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(range(min = 0))]
    pub calories: Option<i32>,
    pub is_active: Option<bool>,
}

/// Recipe list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeQuery {
    pub category: Option<String>,
    pub active: Option<bool>,
}

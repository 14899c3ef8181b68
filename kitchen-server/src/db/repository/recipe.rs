//! Recipe Repository

use super::{RepoError, RepoResult, begin_write};
use crate::utils::money;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Recipe, RecipeCreate, RecipeDetail, RecipeIngredient, RecipeIngredientInput, RecipeQuery,
    RecipeUpdate,
};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

const RECIPE_SELECT: &str = r#"
    SELECT id, name, category, description, prep_time, cook_time, servings, price,
           instructions, image_url, calories, is_active, created_at, updated_at
    FROM recipes
"#;

fn recipe_not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::RecipeNotFound, format!("Recipe {id} not found")).into()
}

fn name_taken(err: sqlx::Error, name: &str) -> RepoError {
    match RepoError::from(err) {
        RepoError::Duplicate(_) => AppError::with_message(
            ErrorCode::RecipeNameExists,
            format!("Recipe '{name}' already exists"),
        )
        .into(),
        other => other,
    }
}

pub async fn find_all(pool: &SqlitePool, query: &RecipeQuery) -> RepoResult<Vec<Recipe>> {
    let sql = format!(
        r#"
        {RECIPE_SELECT}
        WHERE (?1 IS NULL OR category = ?1) AND (?2 IS NULL OR is_active = ?2)
        ORDER BY category, name
        "#
    );
    let recipes = sqlx::query_as::<_, Recipe>(&sql)
        .bind(query.category.as_deref())
        .bind(query.active)
        .fetch_all(pool)
        .await?;
    Ok(recipes)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!("{RECIPE_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(recipe)
}

pub async fn find_ingredients(
    pool: &SqlitePool,
    recipe_id: i64,
) -> RepoResult<Vec<RecipeIngredient>> {
    let ingredients = sqlx::query_as::<_, RecipeIngredient>(
        r#"
        SELECT ri.inventory_item_id, i.name AS item_name,
               ri.quantity, ri.unit, i.cost_per_unit
        FROM recipe_ingredients ri
        JOIN inventory_items i ON i.id = ri.inventory_item_id
        WHERE ri.recipe_id = ?
        ORDER BY ri.id
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;
    Ok(ingredients)
}

/// Recipe with ingredients and their current cost
pub async fn get_detail(pool: &SqlitePool, id: i64) -> RepoResult<RecipeDetail> {
    let recipe = find_by_id(pool, id).await?.ok_or_else(|| recipe_not_found(id))?;
    let ingredients = find_ingredients(pool, id).await?;
    let ingredient_cost = money::sum_lines(
        ingredients
            .iter()
            .map(|i| (i.quantity, i.cost_per_unit)),
    );
    Ok(RecipeDetail {
        recipe,
        ingredients,
        ingredient_cost,
    })
}

async fn insert_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredients: &[RecipeIngredientInput],
) -> RepoResult<()> {
    for ingredient in ingredients {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM inventory_items WHERE id = ?)")
                .bind(ingredient.inventory_item_id)
                .fetch_one(&mut *conn)
                .await?;
        if !exists {
            return Err(AppError::invalid_request(format!(
                "Inventory item {} does not exist",
                ingredient.inventory_item_id
            ))
            .with_detail("inventory_item_id", ingredient.inventory_item_id)
            .into());
        }

        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (id, recipe_id, inventory_item_id, quantity, unit)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(shared::util::snowflake_id())
        .bind(recipe_id)
        .bind(ingredient.inventory_item_id)
        .bind(ingredient.quantity)
        .bind(ingredient.unit.trim())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: RecipeCreate) -> RepoResult<RecipeDetail> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let name = data.name.trim();

    let mut tx = begin_write(pool).await?;

    sqlx::query(
        r#"
        INSERT INTO recipes (
            id, name, category, description, prep_time, cook_time, servings, price,
            instructions, image_url, calories, is_active, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(data.category.trim())
    .bind(data.description.as_deref())
    .bind(data.prep_time)
    .bind(data.cook_time)
    .bind(data.servings)
    .bind(data.price)
    .bind(Json(&data.instructions))
    .bind(data.image_url.as_deref())
    .bind(data.calories)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| name_taken(e, name))?;

    insert_ingredients(&mut tx, id, &data.ingredients).await?;
    tx.commit().await?;

    get_detail(pool, id).await
}

/// Update a recipe. A present `ingredients` list replaces the current one.
pub async fn update(pool: &SqlitePool, id: i64, data: RecipeUpdate) -> RepoResult<RecipeDetail> {
    let now = shared::util::now_millis();
    let name = data.name.as_deref().map(str::trim);

    let mut tx = begin_write(pool).await?;

    let rows = sqlx::query(
        r#"
        UPDATE recipes
        SET name = COALESCE(?1, name), category = COALESCE(?2, category),
            description = COALESCE(?3, description), prep_time = COALESCE(?4, prep_time),
            cook_time = COALESCE(?5, cook_time), servings = COALESCE(?6, servings),
            price = COALESCE(?7, price), instructions = COALESCE(?8, instructions),
            image_url = COALESCE(?9, image_url), calories = COALESCE(?10, calories),
            is_active = COALESCE(?11, is_active), updated_at = ?12
        WHERE id = ?13
        "#,
    )
    .bind(name)
    .bind(data.category.as_deref().map(str::trim))
    .bind(data.description.as_deref())
    .bind(data.prep_time)
    .bind(data.cook_time)
    .bind(data.servings)
    .bind(data.price)
    .bind(data.instructions.as_ref().map(Json))
    .bind(data.image_url.as_deref())
    .bind(data.calories)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| name_taken(e, name.unwrap_or_default()))?;

    if rows.rows_affected() == 0 {
        return Err(recipe_not_found(id));
    }

    if let Some(ingredients) = &data.ingredients {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_ingredients(&mut tx, id, ingredients).await?;
    }

    tx.commit().await?;
    get_detail(pool, id).await
}

/// Delete a recipe that no order references
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = begin_write(pool).await?;

    let used: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE recipe_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if used > 0 {
        return Err(AppError::with_message(
            ErrorCode::RecipeInUse,
            format!("Recipe {id} is referenced by {used} order items; deactivate it instead"),
        )
        .into());
    }

    let rows = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(recipe_not_found(id));
    }

    tx.commit().await?;
    Ok(())
}

//! Reporting queries (read-only)

use super::RepoResult;
use crate::utils::{money, validation};
use chrono::{Days, NaiveDate, Utc};
use shared::error::AppError;
use shared::models::{
    CategoryValuation, DashboardStats, InventoryValuation, OrderStatus, SalesQuery, SalesReport,
    StatusCount, TopRecipe,
};
use sqlx::SqlitePool;

/// Default sales window, in days, ending today
const DEFAULT_SALES_DAYS: u64 = 30;
const TOP_RECIPES_LIMIT: i64 = 10;

/// Midnight UTC of `date` in millis
fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

pub async fn dashboard(pool: &SqlitePool) -> RepoResult<DashboardStats> {
    let today = day_start_millis(Utc::now().date_naive());
    let [a, b, c] = OrderStatus::ACTIVE;

    let row: (i64, i64, i64, i64, f64, i64, i64, f64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM inventory_items),
            (SELECT COUNT(*) FROM inventory_items WHERE current_stock <= min_stock),
            (SELECT COUNT(*) FROM orders WHERE status IN (?1, ?2, ?3)),
            (SELECT COUNT(*) FROM orders WHERE created_at >= ?4),
            (SELECT COALESCE(SUM(total_amount), 0.0)
             FROM orders
             WHERE status = ?5 AND delivered_at >= ?4),
            (SELECT COUNT(*)
             FROM staff_members s
             JOIN users u ON u.id = s.user_id
             WHERE u.is_active = 1),
            (SELECT COUNT(*) FROM suppliers WHERE is_active = 1),
            (SELECT COALESCE(SUM(current_stock * cost_per_unit), 0.0) FROM inventory_items)
        "#,
    )
    .bind(a)
    .bind(b)
    .bind(c)
    .bind(today)
    .bind(OrderStatus::Delivered)
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        total_items: row.0,
        low_stock_items: row.1,
        active_orders: row.2,
        today_orders: row.3,
        today_revenue: money::to_f64(money::to_decimal(row.4)),
        staff_count: row.5,
        supplier_count: row.6,
        inventory_value: money::to_f64(money::to_decimal(row.7)),
    })
}

/// Stock value per category, highest first
pub async fn inventory_valuation(pool: &SqlitePool) -> RepoResult<InventoryValuation> {
    let mut categories = sqlx::query_as::<_, CategoryValuation>(
        r#"
        SELECT category, COUNT(*) AS item_count,
               COALESCE(SUM(current_stock * cost_per_unit), 0.0) AS total_value
        FROM inventory_items
        GROUP BY category
        ORDER BY total_value DESC, category
        "#,
    )
    .fetch_all(pool)
    .await?;

    for c in &mut categories {
        c.total_value = money::to_f64(money::to_decimal(c.total_value));
    }
    let total_value = money::to_f64(
        categories
            .iter()
            .map(|c| money::to_decimal(c.total_value))
            .sum(),
    );

    Ok(InventoryValuation {
        total_value,
        categories,
    })
}

/// Sales for an inclusive date range of order creation days (UTC)
pub async fn sales(pool: &SqlitePool, query: &SalesQuery) -> RepoResult<SalesReport> {
    let today = Utc::now().date_naive();
    let to = match &query.to {
        Some(v) => validation::parse_date(v, "to")?,
        None => today,
    };
    let from = match &query.from {
        Some(v) => validation::parse_date(v, "from")?,
        None => to
            .checked_sub_days(Days::new(DEFAULT_SALES_DAYS - 1))
            .unwrap_or(to),
    };
    if from > to {
        return Err(AppError::validation(format!("from ({from}) is after to ({to})"))
            .with_detail("field", "from")
            .into());
    }

    let start = day_start_millis(from);
    let end = day_start_millis(to.checked_add_days(Days::new(1)).unwrap_or(to));

    let status_counts = sqlx::query_as::<_, StatusCount>(
        r#"
        SELECT status, COUNT(*) AS count
        FROM orders
        WHERE created_at >= ?1 AND created_at < ?2
        GROUP BY status
        ORDER BY count DESC, status
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let (delivered_orders, revenue): (i64, f64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COALESCE(SUM(total_amount), 0.0)
        FROM orders
        WHERE status = ?1 AND created_at >= ?2 AND created_at < ?3
        "#,
    )
    .bind(OrderStatus::Delivered)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    let top_recipes = sqlx::query_as::<_, TopRecipe>(
        r#"
        SELECT oi.recipe_id, r.name AS recipe_name, SUM(oi.quantity) AS quantity,
               COALESCE(SUM(oi.quantity * oi.price), 0.0) AS revenue
        FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        JOIN recipes r ON r.id = oi.recipe_id
        WHERE o.status != ?1 AND o.created_at >= ?2 AND o.created_at < ?3
        GROUP BY oi.recipe_id, r.name
        ORDER BY quantity DESC, revenue DESC
        LIMIT ?4
        "#,
    )
    .bind(OrderStatus::Cancelled)
    .bind(start)
    .bind(end)
    .bind(TOP_RECIPES_LIMIT)
    .fetch_all(pool)
    .await?;

    let total_orders = status_counts.iter().map(|s| s.count).sum();
    let revenue = money::to_decimal(revenue);
    let average_order_value = if delivered_orders > 0 {
        money::to_f64(revenue / rust_decimal::Decimal::from(delivered_orders))
    } else {
        0.0
    };

    Ok(SalesReport {
        from: from.format(validation::DATE_FORMAT).to_string(),
        to: to.format(validation::DATE_FORMAT).to_string(),
        total_orders,
        delivered_orders,
        revenue: money::to_f64(revenue),
        average_order_value,
        status_counts,
        top_recipes: top_recipes
            .into_iter()
            .map(|t| TopRecipe {
                revenue: money::to_f64(money::to_decimal(t.revenue)),
                ..t
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;
    use crate::db::repository::{inventory, order, recipe};
    use shared::models::{
        InventoryCategory, InventoryItemCreate, OrderCreate, OrderItemInput, RecipeCreate,
    };

    async fn seed_item(pool: &SqlitePool, name: &str, category: InventoryCategory, stock: f64, cost: f64) {
        inventory::create(
            pool,
            InventoryItemCreate {
                name: name.into(),
                category,
                current_stock: stock,
                unit: "kg".into(),
                min_stock: 3.0,
                max_stock: 100.0,
                cost_per_unit: cost,
                supplier: None,
                expiry_date: None,
            },
            None,
        )
        .await
        .unwrap();
    }

    async fn seed_order(pool: &SqlitePool, recipe_id: i64, quantity: i32) -> i64 {
        order::create(
            pool,
            OrderCreate {
                customer_name: "Walk-in".into(),
                customer_phone: None,
                customer_address: None,
                items: vec![OrderItemInput {
                    recipe_id,
                    quantity,
                    price: None,
                }],
                notes: None,
                assigned_staff: None,
            },
        )
        .await
        .unwrap()
        .order
        .id
    }

    #[tokio::test]
    async fn test_inventory_valuation_by_category() {
        let pool = test_pool().await;
        seed_item(&pool, "Carrot", InventoryCategory::Vegetables, 10.0, 0.5).await;
        seed_item(&pool, "Leek", InventoryCategory::Vegetables, 2.0, 1.25).await;
        seed_item(&pool, "Beef", InventoryCategory::Meat, 4.0, 12.0).await;

        let valuation = inventory_valuation(&pool).await.unwrap();
        assert_eq!(valuation.total_value, 55.5);
        assert_eq!(valuation.categories.len(), 2);
        assert_eq!(valuation.categories[0].category, "meat");
        assert_eq!(valuation.categories[1].total_value, 7.5);
        assert_eq!(valuation.categories[1].item_count, 2);

        let stats = dashboard(&pool).await.unwrap();
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.low_stock_items, 1);
        assert_eq!(stats.inventory_value, 55.5);
    }

    #[tokio::test]
    async fn test_sales_counts_delivered_revenue() {
        let pool = test_pool().await;
        let soup = recipe::create(
            &pool,
            RecipeCreate {
                name: "Tomato soup".into(),
                category: "Starters".into(),
                description: None,
                prep_time: 5,
                cook_time: 20,
                servings: 1,
                price: 6.5,
                ingredients: vec![],
                instructions: vec![],
                image_url: None,
                calories: None,
                is_active: None,
            },
        )
        .await
        .unwrap()
        .recipe
        .id;

        let delivered = seed_order(&pool, soup, 2).await;
        seed_order(&pool, soup, 1).await;
        let cancelled = seed_order(&pool, soup, 5).await;
        order::update_status(&pool, delivered, OrderStatus::Delivered)
            .await
            .unwrap();
        order::update_status(&pool, cancelled, OrderStatus::Cancelled)
            .await
            .unwrap();

        let report = sales(&pool, &SalesQuery::default()).await.unwrap();
        assert_eq!(report.total_orders, 3);
        assert_eq!(report.delivered_orders, 1);
        assert_eq!(report.revenue, 13.0);
        assert_eq!(report.average_order_value, 13.0);
        assert_eq!(report.top_recipes.len(), 1);
        assert_eq!(report.top_recipes[0].quantity, 3);
        assert_eq!(report.top_recipes[0].revenue, 19.5);

        let stats = dashboard(&pool).await.unwrap();
        assert_eq!(stats.active_orders, 1);
        assert_eq!(stats.today_orders, 3);
        assert_eq!(stats.today_revenue, 13.0);
    }

    #[tokio::test]
    async fn test_sales_rejects_inverted_range() {
        let pool = test_pool().await;
        let err: AppError = sales(
            &pool,
            &SalesQuery {
                from: Some("2024-05-02".into()),
                to: Some("2024-05-01".into()),
            },
        )
        .await
        .unwrap_err()
        .into();
        assert_eq!(err.code, shared::error::ErrorCode::ValidationFailed);
    }
}

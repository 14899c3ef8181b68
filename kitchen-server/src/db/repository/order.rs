//! Customer Order Repository

use super::{RepoError, RepoResult, begin_write, next_document_number, paging};
use crate::utils::money;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Order, OrderCreate, OrderDetail, OrderItem, OrderItemInput, OrderQuery, OrderStatus,
    OrderUpdate,
};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_SELECT: &str = r#"
    SELECT id, order_number, customer_name, customer_phone, customer_address, status,
           notes, total_amount, assigned_staff, created_at, updated_at, delivered_at
    FROM orders
"#;

fn order_not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found")).into()
}

/// An order line with its price settled
struct PricedLine {
    recipe_id: i64,
    quantity: i32,
    price: f64,
}

/// Look up every recipe and settle line prices. A line without a price
/// takes the recipe's menu price.
async fn price_lines(
    conn: &mut SqliteConnection,
    items: &[OrderItemInput],
) -> RepoResult<Vec<PricedLine>> {
    if items.is_empty() {
        return Err(AppError::with_message(ErrorCode::OrderEmpty, "Order has no items").into());
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity < 1 || item.quantity > money::MAX_QUANTITY {
            return Err(AppError::validation(format!(
                "quantity must be between 1 and {}, got {}",
                money::MAX_QUANTITY,
                item.quantity
            ))
            .with_detail("field", "quantity")
            .into());
        }

        let menu_price: Option<f64> = sqlx::query_scalar("SELECT price FROM recipes WHERE id = ?")
            .bind(item.recipe_id)
            .fetch_optional(&mut *conn)
            .await?;
        let Some(menu_price) = menu_price else {
            return Err(
                AppError::invalid_request(format!("Recipe {} does not exist", item.recipe_id))
                    .with_detail("recipe_id", item.recipe_id)
                    .into(),
            );
        };

        let price = match item.price {
            Some(price) => price,
            None if menu_price > 0.0 => menu_price,
            None => {
                return Err(AppError::with_message(
                    ErrorCode::OrderItemPriceMissing,
                    format!("Recipe {} has no menu price; give the line a price", item.recipe_id),
                )
                .into());
            }
        };
        money::validate_amount(price, "price")?;

        lines.push(PricedLine {
            recipe_id: item.recipe_id,
            quantity: item.quantity,
            price,
        });
    }
    Ok(lines)
}

async fn insert_lines(
    conn: &mut SqliteConnection,
    order_id: i64,
    lines: &[PricedLine],
) -> RepoResult<()> {
    for line in lines {
        sqlx::query(
            r#"
            INSERT INTO order_items (id, order_id, recipe_id, quantity, price)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(shared::util::snowflake_id())
        .bind(order_id)
        .bind(line.recipe_id)
        .bind(line.quantity)
        .bind(line.price)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn total_of(lines: &[PricedLine]) -> f64 {
    money::sum_lines(lines.iter().map(|l| (f64::from(l.quantity), l.price)))
}

async fn ensure_user_exists(conn: &mut SqliteConnection, user_id: i64) -> RepoResult<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    if !exists {
        return Err(AppError::invalid_request(format!("Staff user {user_id} does not exist"))
            .with_detail("assigned_staff", user_id)
            .into());
    }
    Ok(())
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        r#"
        SELECT oi.id, oi.order_id, oi.recipe_id, r.name AS recipe_name,
               oi.quantity, oi.price
        FROM order_items oi
        JOIN recipes r ON r.id = oi.recipe_id
        WHERE oi.order_id = ?
        ORDER BY oi.id
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

async fn with_items(pool: &SqlitePool, orders: Vec<Order>) -> RepoResult<Vec<OrderDetail>> {
    let mut details = Vec::with_capacity(orders.len());
    for order in orders {
        let items = find_items(pool, order.id).await?;
        details.push(OrderDetail { order, items });
    }
    Ok(details)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("{ORDER_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

pub async fn get_detail(pool: &SqlitePool, id: i64) -> RepoResult<OrderDetail> {
    let order = find_by_id(pool, id).await?.ok_or_else(|| order_not_found(id))?;
    let items = find_items(pool, id).await?;
    Ok(OrderDetail { order, items })
}

/// Orders, newest first
pub async fn find_all(pool: &SqlitePool, query: &OrderQuery) -> RepoResult<Vec<OrderDetail>> {
    let (limit, offset) = paging(query.limit, query.offset);
    let orders = sqlx::query_as::<_, Order>(&format!(
        r#"
        {ORDER_SELECT}
        WHERE (?1 IS NULL OR status = ?1)
        ORDER BY created_at DESC, id DESC
        LIMIT ?2 OFFSET ?3
        "#
    ))
    .bind(query.status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    with_items(pool, orders).await
}

/// Kitchen queue: live orders, oldest first
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<OrderDetail>> {
    let [a, b, c] = OrderStatus::ACTIVE;
    let orders = sqlx::query_as::<_, Order>(&format!(
        r#"
        {ORDER_SELECT}
        WHERE status IN (?1, ?2, ?3)
        ORDER BY created_at ASC, id ASC
        "#
    ))
    .bind(a)
    .bind(b)
    .bind(c)
    .fetch_all(pool)
    .await?;
    with_items(pool, orders).await
}

/// Insert the order and one order_item row per input line
pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<OrderDetail> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = begin_write(pool).await?;

    if let Some(staff) = data.assigned_staff {
        ensure_user_exists(&mut tx, staff).await?;
    }
    let lines = price_lines(&mut tx, &data.items).await?;
    let total_amount = total_of(&lines);
    let order_number = next_document_number(&mut tx, "orders", "order_number", "ORD").await?;

    sqlx::query(
        r#"
        INSERT INTO orders (
            id, order_number, customer_name, customer_phone, customer_address, status,
            notes, total_amount, assigned_staff, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
        "#,
    )
    .bind(id)
    .bind(&order_number)
    .bind(data.customer_name.trim())
    .bind(data.customer_phone.as_deref())
    .bind(data.customer_address.as_deref())
    .bind(OrderStatus::Pending)
    .bind(data.notes.as_deref())
    .bind(total_amount)
    .bind(data.assigned_staff)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    insert_lines(&mut tx, id, &lines).await?;
    tx.commit().await?;

    tracing::info!(order_id = id, %order_number, lines = lines.len(), total_amount, "Order created");
    get_detail(pool, id).await
}

/// Update customer fields. Items can only be replaced while the order is
/// still pending.
pub async fn update(pool: &SqlitePool, id: i64, data: OrderUpdate) -> RepoResult<OrderDetail> {
    let now = shared::util::now_millis();
    let mut tx = begin_write(pool).await?;

    let status: OrderStatus = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| order_not_found(id))?;

    sqlx::query(
        r#"
        UPDATE orders
        SET customer_name = COALESCE(?1, customer_name),
            customer_phone = COALESCE(?2, customer_phone),
            customer_address = COALESCE(?3, customer_address),
            notes = COALESCE(?4, notes),
            updated_at = ?5
        WHERE id = ?6
        "#,
    )
    .bind(data.customer_name.as_deref().map(str::trim))
    .bind(data.customer_phone.as_deref())
    .bind(data.customer_address.as_deref())
    .bind(data.notes.as_deref())
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(items) = &data.items {
        if status != OrderStatus::Pending {
            return Err(AppError::conflict(format!(
                "Items of a {} order cannot be changed",
                status.as_str()
            ))
            .with_detail("status", status.as_str())
            .into());
        }
        let lines = price_lines(&mut tx, items).await?;
        sqlx::query("DELETE FROM order_items WHERE order_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_lines(&mut tx, id, &lines).await?;
        sqlx::query("UPDATE orders SET total_amount = ? WHERE id = ?")
            .bind(total_of(&lines))
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    get_detail(pool, id).await
}

/// Move a live order to any status. Terminal orders are locked.
///
/// The status is read under the write lock, so a racing update cannot slip
/// past the terminal check.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    next: OrderStatus,
) -> RepoResult<OrderDetail> {
    let mut tx = begin_write(pool).await?;
    let current: OrderStatus = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| order_not_found(id))?;

    if !current.can_transition_to(next) {
        return Err(transition_error(current, next));
    }

    let now = shared::util::now_millis();
    sqlx::query(
        r#"
        UPDATE orders
        SET status = ?1, updated_at = ?2,
            delivered_at = CASE WHEN ?1 = 'delivered' THEN ?2 ELSE delivered_at END
        WHERE id = ?3
        "#,
    )
    .bind(next)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(order_id = id, from = current.as_str(), to = next.as_str(), "Order status changed");
    get_detail(pool, id).await
}

fn transition_error(from: OrderStatus, to: OrderStatus) -> RepoError {
    AppError::with_message(
        ErrorCode::InvalidStatusTransition,
        format!(
            "Cannot change order status from {} to {}",
            from.as_str(),
            to.as_str()
        ),
    )
    .with_detail("from", from.as_str())
    .with_detail("to", to.as_str())
    .into()
}

/// Assign (or with `None`, unassign) a staff user
pub async fn assign(pool: &SqlitePool, id: i64, staff_id: Option<i64>) -> RepoResult<OrderDetail> {
    let mut tx = begin_write(pool).await?;
    if let Some(user_id) = staff_id {
        ensure_user_exists(&mut tx, user_id).await?;
    }
    let rows = sqlx::query("UPDATE orders SET assigned_staff = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(staff_id)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(order_not_found(id));
    }
    tx.commit().await?;

    get_detail(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(order_not_found(id));
    }
    Ok(())
}

//! Purchase Order Repository

use super::stock_movement::{self, NewMovement};
use super::{RepoError, RepoResult, begin_write, next_document_number};
use crate::utils::money;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    MovementType, PURCHASE_RECEIVED_REASON, PurchaseOrder, PurchaseOrderCreate,
    PurchaseOrderDetail, PurchaseOrderLine, PurchaseOrderQuery, PurchaseOrderStatus,
};
use sqlx::{SqliteConnection, SqlitePool};

const PO_SELECT: &str = r#"
    SELECT p.id, p.po_number, p.supplier_id, s.name AS supplier_name, p.status,
           p.total_amount, p.expected_date, p.notes, p.created_by, p.created_at,
           p.updated_at, p.received_at
    FROM purchase_orders p
    JOIN suppliers s ON s.id = p.supplier_id
"#;

const LINE_SELECT: &str = r#"
    SELECT l.id, l.purchase_order_id, l.inventory_item_id, i.name AS item_name,
           l.quantity, l.unit_cost
    FROM purchase_order_lines l
    JOIN inventory_items i ON i.id = l.inventory_item_id
    WHERE l.purchase_order_id = ?
    ORDER BY l.id
"#;

fn po_not_found(id: i64) -> RepoError {
    AppError::with_message(
        ErrorCode::PurchaseOrderNotFound,
        format!("Purchase order {id} not found"),
    )
    .into()
}

async fn exists(conn: &mut SqliteConnection, table: &'static str, id: i64) -> RepoResult<bool> {
    let found: bool = sqlx::query_scalar(&format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?)"))
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(found)
}

async fn load_lines(
    conn: &mut SqliteConnection,
    purchase_order_id: i64,
) -> RepoResult<Vec<PurchaseOrderLine>> {
    let lines = sqlx::query_as::<_, PurchaseOrderLine>(LINE_SELECT)
        .bind(purchase_order_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(lines)
}

async fn status_of(conn: &mut SqliteConnection, id: i64) -> RepoResult<PurchaseOrderStatus> {
    sqlx::query_scalar("SELECT status FROM purchase_orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| po_not_found(id))
}

pub async fn find_all(
    pool: &SqlitePool,
    query: &PurchaseOrderQuery,
) -> RepoResult<Vec<PurchaseOrder>> {
    let orders = sqlx::query_as::<_, PurchaseOrder>(&format!(
        r#"
        {PO_SELECT}
        WHERE (?1 IS NULL OR p.status = ?1) AND (?2 IS NULL OR p.supplier_id = ?2)
        ORDER BY p.created_at DESC, p.id DESC
        "#
    ))
    .bind(query.status)
    .bind(query.supplier_id)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

pub async fn get_detail(pool: &SqlitePool, id: i64) -> RepoResult<PurchaseOrderDetail> {
    let purchase_order = sqlx::query_as::<_, PurchaseOrder>(&format!("{PO_SELECT} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| po_not_found(id))?;
    let mut conn = pool.acquire().await?;
    let lines = load_lines(&mut conn, id).await?;
    Ok(PurchaseOrderDetail {
        purchase_order,
        lines,
    })
}

/// Create a draft purchase order with its lines
pub async fn create(
    pool: &SqlitePool,
    data: PurchaseOrderCreate,
    created_by: Option<i64>,
) -> RepoResult<PurchaseOrderDetail> {
    if data.lines.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::PurchaseOrderEmpty,
            "Purchase order has no lines",
        )
        .into());
    }
    for line in &data.lines {
        money::validate_stock_quantity(line.quantity, "quantity")?;
        money::validate_amount(line.unit_cost, "unit_cost")?;
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let total_amount = money::sum_lines(data.lines.iter().map(|l| (l.quantity, l.unit_cost)));

    let mut tx = begin_write(pool).await?;

    if !exists(&mut tx, "suppliers", data.supplier_id).await? {
        return Err(
            AppError::invalid_request(format!("Supplier {} does not exist", data.supplier_id))
                .with_detail("supplier_id", data.supplier_id)
                .into(),
        );
    }
    for line in &data.lines {
        if !exists(&mut tx, "inventory_items", line.inventory_item_id).await? {
            return Err(AppError::invalid_request(format!(
                "Inventory item {} does not exist",
                line.inventory_item_id
            ))
            .with_detail("inventory_item_id", line.inventory_item_id)
            .into());
        }
    }

    let po_number = next_document_number(&mut tx, "purchase_orders", "po_number", "PO").await?;

    sqlx::query(
        r#"
        INSERT INTO purchase_orders (
            id, po_number, supplier_id, status, total_amount, expected_date, notes,
            created_by, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
        "#,
    )
    .bind(id)
    .bind(&po_number)
    .bind(data.supplier_id)
    .bind(PurchaseOrderStatus::Draft)
    .bind(total_amount)
    .bind(data.expected_date.as_deref())
    .bind(data.notes.as_deref())
    .bind(created_by)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for line in &data.lines {
        sqlx::query(
            r#"
            INSERT INTO purchase_order_lines (
                id, purchase_order_id, inventory_item_id, quantity, unit_cost
            )
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(line.inventory_item_id)
        .bind(line.quantity)
        .bind(line.unit_cost)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(purchase_order_id = id, %po_number, total_amount, "Purchase order created");
    get_detail(pool, id).await
}

/// Draft → ordered, or cancel a purchase order that was not received
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    next: PurchaseOrderStatus,
) -> RepoResult<PurchaseOrderDetail> {
    let mut tx = begin_write(pool).await?;
    let current = status_of(&mut tx, id).await?;

    if !current.can_transition_to(next) {
        return Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!(
                "Cannot change purchase order status from {} to {}",
                current.as_str(),
                next.as_str()
            ),
        )
        .with_detail("from", current.as_str())
        .with_detail("to", next.as_str())
        .into());
    }

    sqlx::query("UPDATE purchase_orders SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(next)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    get_detail(pool, id).await
}

/// Book every line into stock and mark the order received, atomically
pub async fn receive(
    pool: &SqlitePool,
    id: i64,
    performed_by: Option<i64>,
) -> RepoResult<PurchaseOrderDetail> {
    let now = shared::util::now_millis();
    let mut tx = begin_write(pool).await?;

    let status = status_of(&mut tx, id).await?;
    if !status.is_receivable() {
        return Err(AppError::with_message(
            ErrorCode::PurchaseOrderNotReceivable,
            format!("A {} purchase order cannot be received", status.as_str()),
        )
        .with_detail("status", status.as_str())
        .into());
    }

    let po_number: String = sqlx::query_scalar("SELECT po_number FROM purchase_orders WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    let lines = load_lines(&mut tx, id).await?;

    for line in &lines {
        stock_movement::record_in_tx(
            &mut tx,
            line.inventory_item_id,
            NewMovement {
                movement_type: MovementType::In,
                quantity: line.quantity,
                reason: PURCHASE_RECEIVED_REASON.to_string(),
                reference_number: Some(po_number.clone()),
                unit_cost: Some(line.unit_cost),
                notes: None,
                movement_date: now,
                allow_negative: false,
                performed_by,
            },
        )
        .await?;
    }

    sqlx::query(
        r#"
        UPDATE purchase_orders
        SET status = ?1, received_at = ?2, updated_at = ?2
        WHERE id = ?3
        "#,
    )
    .bind(PurchaseOrderStatus::Received)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(purchase_order_id = id, %po_number, lines = lines.len(), "Purchase order received");
    get_detail(pool, id).await
}

/// Delete a purchase order that has not been received
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = begin_write(pool).await?;
    let status = status_of(&mut tx, id).await?;
    if status == PurchaseOrderStatus::Received {
        return Err(AppError::conflict(
            "Received purchase orders are part of the stock history and cannot be deleted",
        )
        .into());
    }
    sqlx::query("DELETE FROM purchase_orders WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{seed_user, test_pool};
    use crate::db::repository::{inventory, supplier};
    use shared::models::{
        InventoryCategory, InventoryItemCreate, MovementQuery, PurchaseOrderLineInput,
        SupplierCreate, UserRole,
    };

    struct Fixture {
        pool: SqlitePool,
        supplier_id: i64,
        rice: i64,
        oil: i64,
    }

    async fn fixture() -> Fixture {
        let pool = test_pool().await;
        let supplier_id = supplier::create(
            &pool,
            SupplierCreate {
                name: "Metro Wholesale".into(),
                contact_person: None,
                email: None,
                phone: None,
                address: None,
                categories: vec![],
                rating: None,
                is_active: None,
            },
        )
        .await
        .unwrap()
        .id;

        let mut ids = Vec::new();
        for (name, stock) in [("Rice", 5.0), ("Olive oil", 0.0)] {
            let item = inventory::create(
                &pool,
                InventoryItemCreate {
                    name: name.into(),
                    category: InventoryCategory::Grains,
                    current_stock: stock,
                    unit: "kg".into(),
                    min_stock: 1.0,
                    max_stock: 50.0,
                    cost_per_unit: 1.0,
                    supplier: Some("Metro Wholesale".into()),
                    expiry_date: None,
                },
                None,
            )
            .await
            .unwrap();
            ids.push(item.id);
        }

        Fixture {
            pool,
            supplier_id,
            rice: ids[0],
            oil: ids[1],
        }
    }

    fn po(f: &Fixture) -> PurchaseOrderCreate {
        PurchaseOrderCreate {
            supplier_id: f.supplier_id,
            lines: vec![
                PurchaseOrderLineInput {
                    inventory_item_id: f.rice,
                    quantity: 20.0,
                    unit_cost: 1.1,
                },
                PurchaseOrderLineInput {
                    inventory_item_id: f.oil,
                    quantity: 4.0,
                    unit_cost: 7.25,
                },
            ],
            expected_date: Some("2024-06-01".into()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_draft_with_total() {
        let f = fixture().await;
        let detail = create(&f.pool, po(&f), None).await.unwrap();
        assert_eq!(detail.purchase_order.status, PurchaseOrderStatus::Draft);
        assert_eq!(detail.purchase_order.total_amount, 51.0);
        assert_eq!(detail.purchase_order.supplier_name, "Metro Wholesale");
        assert_eq!(detail.lines.len(), 2);
        assert!(detail.purchase_order.po_number.starts_with("PO-"));
    }

    #[tokio::test]
    async fn test_receive_books_stock_in_movements() {
        let f = fixture().await;
        let user = seed_user(&f.pool, "stock@kitchen.test", UserRole::InventoryManager).await;
        let id = create(&f.pool, po(&f), Some(user))
            .await
            .unwrap()
            .purchase_order
            .id;
        update_status(&f.pool, id, PurchaseOrderStatus::Ordered)
            .await
            .unwrap();

        let received = receive(&f.pool, id, Some(user)).await.unwrap();
        assert_eq!(received.purchase_order.status, PurchaseOrderStatus::Received);
        assert!(received.purchase_order.received_at.is_some());

        let rice = inventory::get(&f.pool, f.rice).await.unwrap();
        assert_eq!(rice.current_stock, 25.0);
        assert_eq!(rice.cost_per_unit, 1.1);

        let history = stock_movement::find_by_item(&f.pool, f.oil, &MovementQuery::default())
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reason, PURCHASE_RECEIVED_REASON);
        assert_eq!(
            history[0].reference_number.as_deref(),
            Some(received.purchase_order.po_number.as_str())
        );
        assert_eq!(history[0].total_cost, 29.0);

        let err: AppError = receive(&f.pool, id, Some(user)).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::PurchaseOrderNotReceivable);
    }

    #[tokio::test]
    async fn test_cancelled_cannot_be_received() {
        let f = fixture().await;
        let id = create(&f.pool, po(&f), None).await.unwrap().purchase_order.id;
        update_status(&f.pool, id, PurchaseOrderStatus::Cancelled)
            .await
            .unwrap();

        let err: AppError = receive(&f.pool, id, None).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::PurchaseOrderNotReceivable);
        assert_eq!(inventory::get(&f.pool, f.oil).await.unwrap().current_stock, 0.0);
    }

    #[tokio::test]
    async fn test_unknown_supplier_rejected() {
        let f = fixture().await;
        let mut data = po(&f);
        data.supplier_id = 1;
        let err: AppError = create(&f.pool, data, None).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn test_supplier_with_orders_cannot_be_deleted() {
        let f = fixture().await;
        let id = create(&f.pool, po(&f), None).await.unwrap().purchase_order.id;
        let err: AppError = supplier::delete(&f.pool, f.supplier_id)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::SupplierHasPurchaseOrders);

        delete(&f.pool, id).await.unwrap();
        supplier::delete(&f.pool, f.supplier_id).await.unwrap();
    }
}

//! Payroll Repository

use super::{RepoError, RepoResult};
use crate::utils::{money, validation};
use shared::error::{AppError, ErrorCode};
use shared::models::{PayrollEntry, PayrollEntryCreate, PayrollQuery, PayrollStatus};
use sqlx::SqlitePool;

const PAYROLL_SELECT: &str = r#"
    SELECT p.id, p.staff_id, u.name AS staff_name, p.period_start, p.period_end,
           p.hours_worked, p.hourly_rate, p.gross_pay, p.bonus, p.deductions, p.net_pay,
           p.status, p.paid_at, p.notes, p.created_at
    FROM payroll_entries p
    JOIN staff_members s ON s.id = p.staff_id
    JOIN users u ON u.id = s.user_id
"#;

fn entry_not_found(id: i64) -> RepoError {
    AppError::with_message(
        ErrorCode::PayrollEntryNotFound,
        format!("Payroll entry {id} not found"),
    )
    .into()
}

fn already_paid(id: i64) -> RepoError {
    AppError::with_message(
        ErrorCode::PayrollAlreadyPaid,
        format!("Payroll entry {id} is already paid"),
    )
    .into()
}

pub async fn find_all(pool: &SqlitePool, query: &PayrollQuery) -> RepoResult<Vec<PayrollEntry>> {
    let entries = sqlx::query_as::<_, PayrollEntry>(&format!(
        r#"
        {PAYROLL_SELECT}
        WHERE (?1 IS NULL OR p.staff_id = ?1) AND (?2 IS NULL OR p.status = ?2)
        ORDER BY p.period_start DESC, p.created_at DESC
        "#
    ))
    .bind(query.staff_id)
    .bind(query.status)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PayrollEntry>> {
    let entry = sqlx::query_as::<_, PayrollEntry>(&format!("{PAYROLL_SELECT} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(entry)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<PayrollEntry> {
    find_by_id(pool, id).await?.ok_or_else(|| entry_not_found(id))
}

/// Create a pending entry. The rate defaults to the staff member's
/// current hourly rate; gross and net pay are computed here.
pub async fn create(pool: &SqlitePool, data: PayrollEntryCreate) -> RepoResult<PayrollEntry> {
    let start = validation::parse_date(&data.period_start, "period_start")?;
    let end = validation::parse_date(&data.period_end, "period_end")?;
    if end < start {
        return Err(AppError::with_message(
            ErrorCode::PayrollPeriodInvalid,
            format!(
                "period_end {} is before period_start {}",
                data.period_end, data.period_start
            ),
        )
        .into());
    }

    let staff_rate: Option<f64> =
        sqlx::query_scalar("SELECT hourly_rate FROM staff_members WHERE id = ?")
            .bind(data.staff_id)
            .fetch_optional(pool)
            .await?;
    let Some(staff_rate) = staff_rate else {
        return Err(
            AppError::invalid_request(format!("Staff member {} does not exist", data.staff_id))
                .with_detail("staff_id", data.staff_id)
                .into(),
        );
    };

    let hourly_rate = data.hourly_rate.unwrap_or(staff_rate);
    let bonus = data.bonus.unwrap_or(0.0);
    let deductions = data.deductions.unwrap_or(0.0);
    for (value, field) in [
        (data.hours_worked, "hours_worked"),
        (hourly_rate, "hourly_rate"),
        (bonus, "bonus"),
        (deductions, "deductions"),
    ] {
        money::validate_amount(value, field)?;
    }

    let (gross_pay, net_pay) =
        money::payroll_amounts(data.hours_worked, hourly_rate, bonus, deductions);
    if net_pay < 0.0 {
        return Err(AppError::validation(format!(
            "deductions ({deductions}) exceed gross pay plus bonus ({})",
            gross_pay + bonus
        ))
        .with_detail("field", "deductions")
        .into());
    }

    let id = shared::util::snowflake_id();
    sqlx::query(
        r#"
        INSERT INTO payroll_entries (
            id, staff_id, period_start, period_end, hours_worked, hourly_rate, gross_pay,
            bonus, deductions, net_pay, status, notes, created_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(id)
    .bind(data.staff_id)
    .bind(&data.period_start)
    .bind(&data.period_end)
    .bind(data.hours_worked)
    .bind(hourly_rate)
    .bind(gross_pay)
    .bind(bonus)
    .bind(deductions)
    .bind(net_pay)
    .bind(PayrollStatus::Pending)
    .bind(data.notes.as_deref())
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Mark a pending entry as paid
pub async fn pay(pool: &SqlitePool, id: i64) -> RepoResult<PayrollEntry> {
    let rows = sqlx::query(
        r#"
        UPDATE payroll_entries
        SET status = ?1, paid_at = ?2
        WHERE id = ?3 AND status = ?4
        "#,
    )
    .bind(PayrollStatus::Paid)
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(PayrollStatus::Pending)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, id).await? {
            Some(_) => Err(already_paid(id)),
            None => Err(entry_not_found(id)),
        };
    }
    get(pool, id).await
}

/// Delete a pending entry. Paid entries are kept.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let status: PayrollStatus =
        sqlx::query_scalar("SELECT status FROM payroll_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| entry_not_found(id))?;
    if status == PayrollStatus::Paid {
        return Err(already_paid(id));
    }

    sqlx::query("DELETE FROM payroll_entries WHERE id = ? AND status = ?")
        .bind(id)
        .bind(PayrollStatus::Pending)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::staff;
    use crate::db::repository::test_support::test_pool;
    use shared::models::{StaffCreate, UserRole};

    async fn seed_staff(pool: &SqlitePool, rate: f64) -> i64 {
        staff::create(
            pool,
            StaffCreate {
                name: "Dana Fox".into(),
                email: "dana@kitchen.test".into(),
                password: "kitchen-pass".into(),
                role: UserRole::DeliveryStaff,
                phone: None,
                position: "Driver".into(),
                hourly_rate: rate,
                hire_date: None,
                notes: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn entry(staff_id: i64) -> PayrollEntryCreate {
        PayrollEntryCreate {
            staff_id,
            period_start: "2024-05-01".into(),
            period_end: "2024-05-15".into(),
            hours_worked: 80.5,
            hourly_rate: None,
            bonus: Some(50.0),
            deductions: Some(120.25),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_net_pay_uses_staff_rate() {
        let pool = test_pool().await;
        let staff_id = seed_staff(&pool, 16.0).await;
        let e = create(&pool, entry(staff_id)).await.unwrap();
        assert_eq!(e.hourly_rate, 16.0);
        assert_eq!(e.gross_pay, 1288.0);
        assert_eq!(e.net_pay, 1217.75);
        assert_eq!(e.status, PayrollStatus::Pending);
        assert_eq!(e.staff_name, "Dana Fox");
    }

    #[tokio::test]
    async fn test_rate_override() {
        let pool = test_pool().await;
        let staff_id = seed_staff(&pool, 16.0).await;
        let mut data = entry(staff_id);
        data.hourly_rate = Some(20.0);
        data.bonus = None;
        data.deductions = None;
        let e = create(&pool, data).await.unwrap();
        assert_eq!(e.gross_pay, 1610.0);
        assert_eq!(e.net_pay, 1610.0);
    }

    #[tokio::test]
    async fn test_inverted_period_rejected() {
        let pool = test_pool().await;
        let staff_id = seed_staff(&pool, 16.0).await;
        let mut data = entry(staff_id);
        data.period_end = "2024-04-30".into();
        let err: AppError = create(&pool, data).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::PayrollPeriodInvalid);
    }

    #[tokio::test]
    async fn test_pay_once() {
        let pool = test_pool().await;
        let staff_id = seed_staff(&pool, 16.0).await;
        let e = create(&pool, entry(staff_id)).await.unwrap();

        let paid = pay(&pool, e.id).await.unwrap();
        assert_eq!(paid.status, PayrollStatus::Paid);
        assert!(paid.paid_at.is_some());

        let err: AppError = pay(&pool, e.id).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::PayrollAlreadyPaid);
        let err: AppError = delete(&pool, e.id).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::PayrollAlreadyPaid);

        let err: AppError = pay(&pool, 1).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::PayrollEntryNotFound);
    }

    #[tokio::test]
    async fn test_entries_removed_with_staff() {
        let pool = test_pool().await;
        let staff_id = seed_staff(&pool, 16.0).await;
        create(&pool, entry(staff_id)).await.unwrap();
        staff::delete(&pool, staff_id, 0).await.unwrap();
        assert!(find_all(&pool, &PayrollQuery::default()).await.unwrap().is_empty());
    }
}

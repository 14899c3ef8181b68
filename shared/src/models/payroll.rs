//! Payroll Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payroll entry status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PayrollStatus {
    Pending,
    Paid,
}

/// Payroll entry (joined with the staff member's name)
///
/// `gross_pay = hours_worked × hourly_rate`,
/// `net_pay = gross_pay + bonus − deductions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PayrollEntry {
    pub id: i64,
    pub staff_id: i64,
    pub staff_name: String,
    /// YYYY-MM-DD
    pub period_start: String,
    /// YYYY-MM-DD
    pub period_end: String,
    pub hours_worked: f64,
    pub hourly_rate: f64,
    pub gross_pay: f64,
    pub bonus: f64,
    pub deductions: f64,
    pub net_pay: f64,
    pub status: PayrollStatus,
    pub paid_at: Option<i64>,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Create payroll entry payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PayrollEntryCreate {
    pub staff_id: i64,
    pub period_start: String,
    pub period_end: String,
    #[validate(range(min = 0.0, max = 744.0))]
    pub hours_worked: f64,
    /// Defaults to the staff member's current rate
    #[validate(range(min = 0.0))]
    pub hourly_rate: Option<f64>,
    #[validate(range(min = 0.0))]
    pub bonus: Option<f64>,
    #[validate(range(min = 0.0))]
    pub deductions: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Payroll list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollQuery {
    pub staff_id: Option<i64>,
    pub status: Option<PayrollStatus>,
}

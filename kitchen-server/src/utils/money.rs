//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored and serialized as `f64`; every sum or product goes
//! through `Decimal` and is rounded to 2 places (half away from zero).

use rust_decimal::prelude::*;
use shared::error::{AppError, ErrorCode};

const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price / cost
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity on an order line
pub const MAX_QUANTITY: i32 = 9999;
/// Upper bound for a stock movement quantity and for an item balance
pub const MAX_STOCK_QUANTITY: f64 = 1_000_000_000.0;

/// Reject NaN and infinities
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        ))
        .with_detail("field", field_name));
    }
    Ok(())
}

/// Finite, non-negative and below [`MAX_PRICE`]
pub fn validate_amount(value: f64, field_name: &str) -> Result<(), AppError> {
    require_finite(value, field_name)?;
    if !(0.0..=MAX_PRICE).contains(&value) {
        return Err(AppError::validation(format!(
            "{field_name} must be between 0 and {MAX_PRICE}, got {value}"
        ))
        .with_detail("field", field_name));
    }
    Ok(())
}

/// Finite, positive and at most [`MAX_STOCK_QUANTITY`]
pub fn validate_stock_quantity(value: f64, field_name: &str) -> Result<(), AppError> {
    if !value.is_finite() || value <= 0.0 || value > MAX_STOCK_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::InvalidStockQuantity,
            format!("{field_name} must be greater than 0 and at most {MAX_STOCK_QUANTITY}, got {value}"),
        )
        .with_detail("field", field_name));
    }
    Ok(())
}

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// quantity × unit price, rounded
pub fn line_total(quantity: f64, unit_price: f64) -> f64 {
    to_f64(to_decimal(quantity) * to_decimal(unit_price))
}

/// Σ quantity × unit price, rounded once at the end
pub fn sum_lines<I>(lines: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let total = lines
        .into_iter()
        .fold(Decimal::ZERO, |acc, (qty, price)| {
            acc + to_decimal(qty) * to_decimal(price)
        });
    to_f64(total)
}

/// Payroll amounts: (gross, net) where gross = hours × rate and
/// net = gross + bonus − deductions
pub fn payroll_amounts(hours: f64, rate: f64, bonus: f64, deductions: f64) -> (f64, f64) {
    let gross = to_decimal(hours) * to_decimal(rate);
    let net = gross + to_decimal(bonus) - to_decimal(deductions);
    (to_f64(gross), to_f64(net))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_lines_avoids_float_drift() {
        // 0.1 + 0.2 in f64 is 0.30000000000000004
        assert_eq!(sum_lines([(1.0, 0.1), (1.0, 0.2)]), 0.3);
        assert_eq!(sum_lines([(3.0, 12.5), (2.0, 4.99)]), 47.48);
        assert_eq!(sum_lines(Vec::<(f64, f64)>::new()), 0.0);
    }

    #[test]
    fn test_line_total_rounds_half_away_from_zero() {
        assert_eq!(line_total(2.5, 1.01), 2.53); // 2.525
        assert_eq!(line_total(0.0, 99.0), 0.0);
    }

    #[test]
    fn test_payroll_amounts() {
        let (gross, net) = payroll_amounts(40.0, 15.5, 50.0, 20.25);
        assert_eq!(gross, 620.0);
        assert_eq!(net, 649.75);
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(10.0, "price").is_ok());
        assert!(validate_amount(-1.0, "price").is_err());
        assert!(validate_amount(f64::NAN, "price").is_err());
        assert!(validate_amount(f64::INFINITY, "price").is_err());
        assert!(validate_amount(MAX_PRICE + 1.0, "price").is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(0.25, "quantity").is_ok());
        assert!(validate_stock_quantity(MAX_STOCK_QUANTITY, "quantity").is_ok());
        assert!(validate_stock_quantity(0.0, "quantity").is_err());
        assert!(validate_stock_quantity(1e308, "quantity").is_err());
        let err = validate_stock_quantity(f64::INFINITY, "quantity").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStockQuantity);
    }
}

//! Conversions between stored (REAL) and in-memory (decimal) money values.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::config::{MAX_PRICE, MONEY_SCALE};
use crate::errors::{AppError, AppResult};

/// Read a stored amount, rounded to cents. Non-finite values read as zero.
pub fn from_storage(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or_default()
        .round_dp(MONEY_SCALE)
}

/// Convert an amount for storage in a REAL column.
pub fn to_storage(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Parse a client-supplied price, which must be a positive, finite number.
pub fn positive_price(value: f64, field: &str) -> AppResult<Decimal> {
    let price = Decimal::from_f64(value)
        .filter(|_| value.is_finite())
        .map(|d| d.round_dp(MONEY_SCALE))
        .ok_or_else(|| AppError::validation(format!("{} must be a number", field)))?;

    if price <= Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} must be a positive number",
            field
        )));
    }
    if price > Decimal::from(MAX_PRICE) {
        return Err(AppError::validation(format!(
            "{} must not exceed {}",
            field, MAX_PRICE
        )));
    }
    Ok(price)
}

/// `price * qty`, failing instead of overflowing.
pub fn line_total(price: Decimal, qty: i32) -> AppResult<Decimal> {
    price
        .checked_mul(Decimal::from(qty))
        .ok_or_else(total_too_large)
}

/// Sum of line totals, failing instead of overflowing.
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> AppResult<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(total_too_large)
}

fn total_too_large() -> AppError {
    AppError::validation("order total is too large")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_round_trip_keeps_cents() {
        let price = Decimal::new(1999, 2);
        assert_eq!(from_storage(to_storage(price)), price);
    }

    #[test]
    fn test_from_storage_rounds() {
        assert_eq!(from_storage(10.004), Decimal::new(1000, 2));
        assert_eq!(from_storage(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn test_positive_price() {
        assert_eq!(positive_price(49.5, "price").unwrap(), Decimal::new(4950, 2));
        assert!(positive_price(0.0, "price").is_err());
        assert!(positive_price(-3.0, "price").is_err());
        assert!(positive_price(0.001, "price").is_err());
        assert!(positive_price(f64::INFINITY, "price").is_err());
        assert!(positive_price(1e20, "price").is_err());
        assert!(positive_price(1_000_000.0, "price").is_ok());
    }

    #[test]
    fn test_overflowing_totals_are_errors() {
        assert_eq!(line_total(Decimal::new(250, 2), 4).unwrap(), Decimal::new(10, 0));
        assert!(matches!(
            line_total(Decimal::MAX, 2),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            checked_sum([Decimal::MAX, Decimal::ONE]),
            Err(AppError::Validation(_))
        ));
        assert_eq!(checked_sum([]).unwrap(), Decimal::ZERO);
    }
}

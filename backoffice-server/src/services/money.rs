//! Monetary arithmetic helpers
//!
//! Amounts are stored as f64 but every computation routes through
//! `rust_decimal` so accumulation and percentage math stay exact at
//! cent precision.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Convert an f64 amount to Decimal
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert a Decimal back to f64
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Line subtotal: quantity x unit price, rounded to cents, clamped at zero
pub fn line_subtotal(quantity: i64, unit_price: f64) -> f64 {
    let total = (Decimal::from(quantity) * to_decimal(unit_price)).round_dp(2);
    if total.is_sign_negative() {
        0.0
    } else {
        to_f64(total)
    }
}

/// Sum a series of f64 amounts without f64 accumulation drift
pub fn sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let total: Decimal = values.into_iter().map(to_decimal).sum();
    to_f64(total.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let a = 0.1_f64;
        let b = 0.2_f64;
        let sum_f64 = a + b;

        // f64 fails
        assert_ne!(sum_f64, 0.3);

        // Decimal succeeds
        let sum_dec = to_decimal(a) + to_decimal(b);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        // Sum 0.01 one thousand times
        let total = sum(std::iter::repeat(0.01).take(1000));
        assert_eq!(total, 10.0);
    }

    #[test]
    fn test_line_subtotal() {
        assert_eq!(line_subtotal(3, 10.99), 32.97);
        assert_eq!(line_subtotal(1, 0.0), 0.0);
        assert_eq!(line_subtotal(7, 2.5), 17.5);
    }

    #[test]
    fn test_line_subtotal_clamps_negative() {
        // Negative prices never produce a negative subtotal
        assert_eq!(line_subtotal(3, -1.0), 0.0);
    }

    #[test]
    fn test_line_subtotal_rounds_to_cents() {
        // 3 x 0.333 = 0.999 -> 1.00
        assert_eq!(line_subtotal(3, 0.333), 1.0);
    }
}

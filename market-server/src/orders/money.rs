//! Money calculation utilities using rust_decimal for precision
//!
//! Monetary model fields are `f64` for storage/serialization; every
//! calculation goes through `Decimal` and is rounded to 2 decimal places
//! half-up, so order totals satisfy their invariants exactly at currency
//! precision.

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: u32 = 9999;

/// Convert an f64 into a Decimal (invalid values collapse to zero)
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert a Decimal back to a rounded f64
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// a + b at currency precision
pub fn add(a: f64, b: f64) -> f64 {
    to_f64(to_decimal(a) + to_decimal(b))
}

/// a - b, floored at zero, at currency precision
pub fn sub_floor_zero(a: f64, b: f64) -> f64 {
    to_f64((to_decimal(a) - to_decimal(b)).max(Decimal::ZERO))
}

/// unit price x quantity at currency precision
pub fn line_total(unit_price: f64, quantity: u32) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// percent (0-100) of an amount at currency precision
pub fn percent_of(amount: f64, percent: f64) -> f64 {
    to_f64(to_decimal(amount) * to_decimal(percent) / Decimal::from(100))
}

/// `subtotal - discount + shipping` at currency precision
pub fn order_total(subtotal: f64, discount: f64, shipping: f64) -> f64 {
    to_f64(to_decimal(subtotal) - to_decimal(discount) + to_decimal(shipping))
}

/// Net vendor earnings: `subtotal - discount - commission`, floored at zero
pub fn vendor_net(subtotal: f64, discount: f64, commission: f64) -> f64 {
    to_f64((to_decimal(subtotal) - to_decimal(discount) - to_decimal(commission)).max(Decimal::ZERO))
}

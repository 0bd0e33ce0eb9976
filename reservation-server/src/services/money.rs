//! Money calculation using rust_decimal for precision
//!
//! Amounts are `f64` on the wire and in storage; arithmetic happens on
//! `Decimal` and is rounded half-up to 2 decimal places. Values that do not
//! fit a `Decimal` are reported, never clamped.

use rust_decimal::prelude::*;
use thiserror::Error;

const DECIMAL_PLACES: u32 = 2;

pub const MSG_OUT_OF_RANGE: &str = "El monto está fuera del rango permitido";

/// A monetary value or result outside the representable range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", MSG_OUT_OF_RANGE)]
pub struct OutOfRange {
    /// Wire (camelCase) field the value came from
    pub field: &'static str,
}

pub fn to_decimal(value: f64, field: &'static str) -> Result<Decimal, OutOfRange> {
    Decimal::from_f64(value).ok_or(OutOfRange { field })
}

pub fn to_f64(value: Decimal, field: &'static str) -> Result<f64, OutOfRange> {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .ok_or(OutOfRange { field })
}

/// `guests * amount - discount`
pub fn reservation_total(
    number_of_guests: i64,
    amount: f64,
    discount: f64,
) -> Result<f64, OutOfRange> {
    let amount = to_decimal(amount, "amount")?;
    let discount = to_decimal(discount, "discount")?;
    let overflow = OutOfRange {
        field: "totalAmount",
    };

    let total = Decimal::from(number_of_guests)
        .checked_mul(amount)
        .and_then(|subtotal| subtotal.checked_sub(discount))
        .ok_or(overflow)?;
    to_f64(total, "totalAmount")
}

//! Fixed-point conversions between API decimals and stored integers
//!
//! Money is stored as integer cents and quantities as integer thousandths.
//! Input carrying more precision than the stored scale is rejected rather
//! than rounded.

use rust_decimal::prelude::*;
use shared::ErrorCode;

use crate::core::{MarketError, MarketResult};

/// Money: 2 decimal places, half away from zero
pub const MONEY_SCALE: u32 = 2;
/// Quantities: 3 decimal places (grams of a kilogram)
pub const QUANTITY_SCALE: u32 = 3;

/// Upper bound for a unit price
const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Upper bound for a quantity
const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Round a monetary amount to cents
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn to_scaled(value: Decimal, scale: u32, field: &str, code: ErrorCode) -> MarketResult<i64> {
    if value.normalize().scale() > scale {
        return Err(MarketError::invalid_with(
            code,
            format!("{} supports at most {} decimal places, got {}", field, scale, value),
        ));
    }
    (value * Decimal::from(10i64.pow(scale)))
        .trunc()
        .to_i64()
        .ok_or_else(|| MarketError::invalid_with(code, format!("{} is out of range", field)))
}

/// Validate a unit price and convert it to cents
pub fn price_to_cents(price: Decimal) -> MarketResult<i64> {
    if price <= Decimal::ZERO {
        return Err(MarketError::invalid_with(
            ErrorCode::ListingInvalidPrice,
            format!("unit price must be positive, got {}", price),
        ));
    }
    if price > MAX_PRICE {
        return Err(MarketError::invalid_with(
            ErrorCode::ListingInvalidPrice,
            format!("unit price exceeds maximum allowed ({}), got {}", MAX_PRICE, price),
        ));
    }
    to_scaled(price, MONEY_SCALE, "unit price", ErrorCode::ListingInvalidPrice)
}

/// Convert an already-rounded amount (totals, fees) to cents
pub fn amount_to_cents(amount: Decimal) -> MarketResult<i64> {
    to_scaled(round_money(amount), MONEY_SCALE, "amount", ErrorCode::ValueOutOfRange)
}

#[inline]
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, MONEY_SCALE)
}

/// Validate a quantity and convert it to thousandths
pub fn quantity_to_milli(quantity: Decimal) -> MarketResult<i64> {
    if quantity <= Decimal::ZERO {
        return Err(MarketError::invalid_with(
            ErrorCode::InvalidQuantity,
            format!("quantity must be positive, got {}", quantity),
        ));
    }
    if quantity > MAX_QUANTITY {
        return Err(MarketError::invalid_with(
            ErrorCode::InvalidQuantity,
            format!("quantity exceeds maximum allowed ({}), got {}", MAX_QUANTITY, quantity),
        ));
    }
    to_scaled(quantity, QUANTITY_SCALE, "quantity", ErrorCode::InvalidQuantity)
}

#[inline]
pub fn milli_to_quantity(milli: i64) -> Decimal {
    Decimal::new(milli, QUANTITY_SCALE).normalize()
}

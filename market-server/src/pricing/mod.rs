//! Pricing engine
//!
//! Pure computation of producer payout and platform fee, plus the
//! fixed-point conversions used when persisting amounts.

mod fee;
pub mod money;

pub use fee::{FeePolicy, Payout};

use rust_decimal::Decimal;
use shared::models::PricingQuote;

use crate::core::MarketResult;

/// Quote a price and quantity under `policy`
pub fn quote(
    policy: &FeePolicy,
    unit_price: Decimal,
    quantity: Decimal,
) -> MarketResult<PricingQuote> {
    let payout = policy.compute_payout(unit_price, quantity)?;
    Ok(PricingQuote {
        unit_price,
        quantity,
        producer_payout_per_unit: payout.producer_payout_per_unit,
        platform_fee_total: payout.platform_fee_total,
    })
}

/// Order total: quantity times unit price, rounded to cents
pub fn order_total(unit_price: Decimal, quantity: Decimal) -> Decimal {
    money::round_money(unit_price * quantity)
}

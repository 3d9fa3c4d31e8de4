//! Platform fee policy
//!
//! Two business rules exist for the fee: a percentage of the unit price, or a
//! flat deduction per unit (transport charge). Exactly one is active, chosen
//! by configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::round_money;
use crate::core::{MarketError, MarketResult};

/// Fee rule applied to every listing and order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeePolicy {
    /// Marketplace keeps `rate` of the unit price
    Percentage { rate: Decimal },
    /// Marketplace keeps a fixed amount per unit sold
    FlatPerUnit { deduction: Decimal },
}

/// Result of [`FeePolicy::compute_payout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub producer_payout_per_unit: Decimal,
    pub platform_fee_total: Decimal,
}

impl FeePolicy {
    /// 15%
    pub const DEFAULT_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);
    /// 5 per unit
    pub const DEFAULT_FLAT_DEDUCTION: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

    pub fn percentage(rate: Decimal) -> MarketResult<Self> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(MarketError::invalid(format!(
                "fee rate must be within [0, 1], got {}",
                rate
            )));
        }
        Ok(Self::Percentage { rate })
    }

    pub fn flat_per_unit(deduction: Decimal) -> MarketResult<Self> {
        if deduction < Decimal::ZERO {
            return Err(MarketError::invalid(format!(
                "flat deduction must be non-negative, got {}",
                deduction
            )));
        }
        Ok(Self::FlatPerUnit { deduction })
    }

    /// Build from the `FEE_POLICY` name and its parameters
    pub fn from_parts(kind: &str, rate: Decimal, deduction: Decimal) -> MarketResult<Self> {
        match kind {
            "percentage" => Self::percentage(rate),
            "flat_per_unit" | "flat" => Self::flat_per_unit(deduction),
            other => Err(MarketError::invalid(format!("unknown fee policy '{}'", other))),
        }
    }

    /// Producer payout per unit and total platform fee for `quantity` units.
    ///
    /// Pure; rounds once to cents at the end.
    pub fn compute_payout(&self, unit_price: Decimal, quantity: Decimal) -> MarketResult<Payout> {
        if unit_price <= Decimal::ZERO {
            return Err(MarketError::invalid(format!(
                "unit price must be positive, got {}",
                unit_price
            )));
        }
        if quantity <= Decimal::ZERO {
            return Err(MarketError::invalid(format!(
                "quantity must be positive, got {}",
                quantity
            )));
        }

        let (payout, fee_total) = match *self {
            Self::Percentage { rate } => (
                unit_price * (Decimal::ONE - rate),
                unit_price * rate * quantity,
            ),
            Self::FlatPerUnit { deduction } => {
                if deduction > unit_price {
                    return Err(MarketError::invalid(format!(
                        "unit price {} is below the per-unit deduction {}",
                        unit_price, deduction
                    )));
                }
                (unit_price - deduction, deduction * quantity)
            }
        };

        Ok(Payout {
            producer_payout_per_unit: round_money(payout),
            platform_fee_total: round_money(fee_total),
        })
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::Percentage {
            rate: Self::DEFAULT_RATE,
        }
    }
}

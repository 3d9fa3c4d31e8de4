//! Listing Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Moderation status of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Pending,
    Approved,
    Refused,
}

impl ListingStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Refused => "refused",
        }
    }
}

/// Listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub id: String,
    pub producer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_name: Option<String>,
    pub item_name: String,
    /// Buyer-facing price per unit
    pub unit_price: Decimal,
    /// What the producer receives per unit
    pub producer_payout: Decimal,
    pub available_quantity: Decimal,
    pub initial_quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<u8>,
    pub status: ListingStatus,
    /// Unix millis
    pub created_at: i64,
}

/// Create listing payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListingCreate {
    #[validate(length(min = 1, max = 120, message = "item name must be 1-120 characters"))]
    #[serde(alias = "vegetable_name")]
    pub item_name: String,
    #[serde(alias = "price")]
    pub unit_price: Decimal,
    pub quantity: Decimal,
    #[validate(length(max = 512))]
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
}

/// Created listing together with its pricing breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingCreated {
    pub listing: ListingResponse,
    pub pricing: PricingQuote,
}

/// Administrator moderation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationRequest {
    #[serde(alias = "action")]
    pub status: ListingStatus,
}

/// Pricing quote request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingQuoteRequest {
    pub unit_price: Decimal,
    pub quantity: Decimal,
}

/// Pricing breakdown for a price and quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingQuote {
    pub unit_price: Decimal,
    pub quantity: Decimal,
    pub producer_payout_per_unit: Decimal,
    pub platform_fee_total: Decimal,
}

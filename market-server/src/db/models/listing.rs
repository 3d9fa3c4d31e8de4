//! Listing Model

use serde::{Deserialize, Serialize};
use shared::models::{ListingResponse, ListingStatus};
use surrealdb::RecordId;

use crate::pricing::money::{cents_to_decimal, milli_to_quantity};

/// Stored listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: RecordId,
    /// Record link to the owning producer account
    pub producer: RecordId,
    /// Joined from the producer account on read
    #[serde(default, skip_serializing)]
    pub producer_name: Option<String>,
    pub item_name: String,
    /// Cents
    pub unit_price: i64,
    /// Cents
    pub producer_payout: i64,
    /// Thousandths
    pub available_quantity: i64,
    /// Thousandths
    pub initial_quantity: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub quality_score: Option<i64>,
    pub status: ListingStatus,
    pub created_at: i64,
}

impl Listing {
    pub fn is_orderable(&self) -> bool {
        self.status == ListingStatus::Approved && self.available_quantity > 0
    }
}

/// Create listing payload, already priced and converted
#[derive(Debug, Clone, Serialize)]
pub struct NewListing {
    pub producer: RecordId,
    pub item_name: String,
    pub unit_price: i64,
    pub producer_payout: i64,
    pub available_quantity: i64,
    pub initial_quantity: i64,
    pub image_url: Option<String>,
    pub quality_score: Option<i64>,
    pub status: ListingStatus,
    pub created_at: i64,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id.to_string(),
            producer_id: listing.producer.to_string(),
            producer_name: listing.producer_name,
            item_name: listing.item_name,
            unit_price: cents_to_decimal(listing.unit_price),
            producer_payout: cents_to_decimal(listing.producer_payout),
            available_quantity: milli_to_quantity(listing.available_quantity),
            initial_quantity: milli_to_quantity(listing.initial_quantity),
            image_url: listing.image_url,
            quality_score: listing
                .quality_score
                .and_then(|score| u8::try_from(score).ok()),
            status: listing.status,
            created_at: listing.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn response_converts_fixed_point_fields() {
        let listing = Listing {
            id: RecordId::from_table_key("listing", "l1"),
            producer: RecordId::from_table_key("account", "a1"),
            producer_name: Some("Bob".into()),
            item_name: "Tomato".into(),
            unit_price: 4000,
            producer_payout: 3400,
            available_quantity: 15_000,
            initial_quantity: 20_000,
            image_url: None,
            quality_score: Some(72),
            status: ListingStatus::Approved,
            created_at: 1,
        };
        assert!(listing.is_orderable());
        let response = ListingResponse::from(listing);
        assert_eq!(response.id, "listing:l1");
        assert_eq!(response.producer_id, "account:a1");
        assert_eq!(response.unit_price, Decimal::new(40, 0));
        assert_eq!(response.producer_payout, Decimal::new(34, 0));
        assert_eq!(response.available_quantity, Decimal::new(15, 0));
        assert_eq!(response.quality_score, Some(72));
    }
}

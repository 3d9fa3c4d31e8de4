//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// How the buyer pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
    Upi,
    Card,
    BankTransfer,
}

/// Place order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    #[serde(alias = "product_id")]
    pub listing_id: String,
    pub quantity: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[validate(length(max = 500, message = "delivery address is too long"))]
    #[serde(default)]
    pub delivery_address: String,
}

/// Order response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub buyer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
    pub listing_id: String,
    /// Item name at purchase time
    pub item_name: String,
    pub quantity: Decimal,
    /// Unit price at purchase time
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub platform_fee: Decimal,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub status: OrderStatus,
    /// Unix millis
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_create_defaults() {
        let req: OrderCreate =
            serde_json::from_str(r#"{"product_id":"listing:l1","quantity":5}"#).unwrap();
        assert_eq!(req.listing_id, "listing:l1");
        assert_eq!(req.payment_method, PaymentMethod::CashOnDelivery);
        assert!(req.delivery_address.is_empty());
    }

    #[test]
    fn payment_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
        let upi: PaymentMethod = serde_json::from_str("\"upi\"").unwrap();
        assert_eq!(upi, PaymentMethod::Upi);
    }
}

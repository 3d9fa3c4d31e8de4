//! Purchase Order Model

use serde::{Deserialize, Serialize};
use shared::models::{OrderResponse, OrderStatus, PaymentMethod};
use surrealdb::RecordId;

use crate::pricing::money::{cents_to_decimal, milli_to_quantity};

/// Stored order; the listing snapshot fields never change after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: RecordId,
    pub buyer: RecordId,
    /// Joined from the buyer account on read
    #[serde(default, skip_serializing)]
    pub buyer_name: Option<String>,
    pub listing: RecordId,
    pub item_name: String,
    /// Thousandths
    pub quantity: i64,
    /// Cents, as observed when the stock was claimed
    pub unit_price: i64,
    /// Cents
    pub total_price: i64,
    /// Cents
    pub platform_fee: i64,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub status: OrderStatus,
    pub created_at: i64,
}

/// Order content written inside the placement transaction
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub buyer: RecordId,
    pub listing: RecordId,
    pub item_name: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub total_price: i64,
    pub platform_fee: i64,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub status: OrderStatus,
    pub created_at: i64,
}

impl From<PurchaseOrder> for OrderResponse {
    fn from(order: PurchaseOrder) -> Self {
        Self {
            id: order.id.to_string(),
            buyer_id: order.buyer.to_string(),
            buyer_name: order.buyer_name,
            listing_id: order.listing.to_string(),
            item_name: order.item_name,
            quantity: milli_to_quantity(order.quantity),
            unit_price: cents_to_decimal(order.unit_price),
            total_price: cents_to_decimal(order.total_price),
            platform_fee: cents_to_decimal(order.platform_fee),
            payment_method: order.payment_method,
            delivery_address: order.delivery_address,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

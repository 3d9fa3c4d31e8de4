//! Purchase Order Repository
//!
//! Orders are only ever written together with the stock they consume. The
//! placement transaction claims stock with a conditional update and creates
//! the order in the same transaction; a claim that matches nothing aborts
//! the whole thing.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{NewOrder, PurchaseOrder};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

const STOCK_CLAIM_REJECTED: &str = "stock_claim_rejected";
const ORDER_NOT_CANCELLABLE: &str = "order_not_cancellable";

const PLACE_ORDER: &str = r#"
BEGIN TRANSACTION;
LET $claimed = (
    UPDATE $listing SET available_quantity -= $quantity
    WHERE available_quantity >= $quantity
        AND unit_price = $unit_price
        AND status = 'approved'
    RETURN AFTER
);
IF array::len($claimed) = 0 { THROW "stock_claim_rejected"; };
CREATE $order_id CONTENT $order;
COMMIT TRANSACTION;
"#;

const CANCEL_ORDER: &str = r#"
BEGIN TRANSACTION;
LET $cancelled = (
    UPDATE $order SET status = 'cancelled' WHERE status = 'completed' RETURN AFTER
);
IF array::len($cancelled) = 0 { THROW "order_not_cancellable"; };
UPDATE $listing SET available_quantity += $quantity;
COMMIT TRANSACTION;
"#;

const SELECT_WITH_BUYER: &str = "SELECT *, buyer.display_name AS buyer_name FROM purchase_order";

/// Why a transactional write did not commit
#[derive(Debug, Error)]
pub enum PlacementError {
    /// The guarded update matched nothing; state must be re-read
    #[error("condition not met")]
    Rejected,

    /// The storage engine reported a transaction conflict
    #[error("transaction conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] RepoError),
}

/// Sort a storage error into rejected / conflict / other
fn classify(message: String, marker: &str) -> PlacementError {
    let lower = message.to_lowercase();
    if message.contains(marker) {
        PlacementError::Rejected
    } else if lower.contains("conflict")
        || lower.contains("can be retried")
        || lower.contains("resource busy")
    {
        PlacementError::Conflict(message)
    } else {
        PlacementError::Store(RepoError::Database(message))
    }
}

/// Pick the most specific failure among all statement errors of a response
fn first_failure(errors: Vec<String>, marker: &str) -> Option<PlacementError> {
    let mut fallback = None;
    for message in errors {
        match classify(message, marker) {
            PlacementError::Rejected => return Some(PlacementError::Rejected),
            PlacementError::Conflict(m) => fallback = Some(PlacementError::Conflict(m)),
            other => {
                if fallback.is_none() {
                    fallback = Some(other);
                }
            }
        }
    }
    fallback
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Claim `order.quantity` from the listing at `order.unit_price` and
    /// create the order, atomically
    pub async fn place_atomically(
        &self,
        order_id: RecordId,
        order: NewOrder,
    ) -> Result<PurchaseOrder, PlacementError> {
        let response = self
            .base
            .db()
            .query(PLACE_ORDER)
            .bind(("listing", order.listing.clone()))
            .bind(("quantity", order.quantity))
            .bind(("unit_price", order.unit_price))
            .bind(("order_id", order_id.clone()))
            .bind(("order", order))
            .await;

        let mut response = response.map_err(|e| classify(e.to_string(), STOCK_CLAIM_REJECTED))?;
        let errors: Vec<String> = response
            .take_errors()
            .into_values()
            .map(|e| e.to_string())
            .collect();
        if let Some(failure) = first_failure(errors, STOCK_CLAIM_REJECTED) {
            return Err(failure);
        }

        self.find_by_id(&order_id)
            .await?
            .ok_or_else(|| {
                PlacementError::Store(RepoError::Database("Placed order vanished".into()))
            })
    }

    /// Mark a completed order cancelled and return its quantity to the
    /// listing, atomically. A deleted listing is left alone.
    pub async fn cancel_atomically(
        &self,
        order: &PurchaseOrder,
    ) -> Result<PurchaseOrder, PlacementError> {
        let response = self
            .base
            .db()
            .query(CANCEL_ORDER)
            .bind(("order", order.id.clone()))
            .bind(("listing", order.listing.clone()))
            .bind(("quantity", order.quantity))
            .await;

        let mut response = response.map_err(|e| classify(e.to_string(), ORDER_NOT_CANCELLABLE))?;
        let errors: Vec<String> = response
            .take_errors()
            .into_values()
            .map(|e| e.to_string())
            .collect();
        if let Some(failure) = first_failure(errors, ORDER_NOT_CANCELLABLE) {
            return Err(failure);
        }

        self.find_by_id(&order.id)
            .await?
            .ok_or_else(|| PlacementError::Store(RepoError::NotFound(order.id.to_string())))
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<PurchaseOrder>> {
        let mut result = self
            .base
            .db()
            .query(format!("{} WHERE id = $id", SELECT_WITH_BUYER))
            .bind(("id", id.clone()))
            .await?;
        let orders: Vec<PurchaseOrder> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// A buyer's orders, newest first
    pub async fn find_by_buyer(&self, buyer: &RecordId) -> RepoResult<Vec<PurchaseOrder>> {
        let orders: Vec<PurchaseOrder> = self
            .base
            .db()
            .query(format!(
                "{} WHERE buyer = $buyer ORDER BY created_at DESC",
                SELECT_WITH_BUYER
            ))
            .bind(("buyer", buyer.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders placed against a producer's listings, newest first
    pub async fn find_for_producer(&self, producer: &RecordId) -> RepoResult<Vec<PurchaseOrder>> {
        let orders: Vec<PurchaseOrder> = self
            .base
            .db()
            .query(format!(
                "{} WHERE listing.producer = $producer ORDER BY created_at DESC",
                SELECT_WITH_BUYER
            ))
            .bind(("producer", producer.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_listing(&self, listing: &RecordId) -> RepoResult<Vec<PurchaseOrder>> {
        let orders: Vec<PurchaseOrder> = self
            .base
            .db()
            .query(format!("{} WHERE listing = $listing", SELECT_WITH_BUYER))
            .bind(("listing", listing.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }
}

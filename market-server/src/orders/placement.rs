//! Order placement and cancellation
//!
//! Placement checks run against a fresh read of the listing, then the stock
//! claim and the order write commit together in one store transaction. When
//! the guarded claim matches nothing the listing changed under us: re-read,
//! re-check, and try again a bounded number of times.

use std::time::Duration;

use rust_decimal::Decimal;
use shared::ErrorCode;
use shared::models::{ListingStatus, OrderCreate, OrderResponse, OrderStatus, Role};
use surrealdb::RecordId;
use validator::Validate;

use crate::auth::{CurrentUser, Operation, authorize, require_role};
use crate::core::{MarketError, MarketResult};
use crate::db::bounded;
use crate::db::models::{
    LISTING_TABLE, Listing, NewOrder, ORDER_TABLE, PurchaseOrder, new_record_id, now_millis,
    parse_record_id,
};
use crate::db::repository::{ListingRepository, OrderRepository, PlacementError};
use crate::orders::locks::ListingLocks;
use crate::pricing::money::{
    amount_to_cents, cents_to_decimal, milli_to_quantity, quantity_to_milli,
};
use crate::pricing::{self, FeePolicy};

/// Pause before retrying after a storage conflict
const CONFLICT_BACKOFF_MS: u64 = 10;

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    listings: ListingRepository,
    fee_policy: FeePolicy,
    locks: ListingLocks,
    store_timeout: Duration,
    max_retries: u32,
}

/// Bounded retries for one store operation
struct Retries {
    operation: &'static str,
    attempt: u32,
    max_retries: u32,
}

impl Retries {
    fn new(operation: &'static str, max_retries: u32) -> Self {
        Self {
            operation,
            attempt: 1,
            max_retries,
        }
    }

    fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Record a failed attempt; ServiceUnavailable once the budget is spent
    async fn spend(&mut self, conflicted: bool) -> MarketResult<()> {
        if self.attempt > self.max_retries {
            tracing::warn!(
                operation = self.operation,
                attempts = self.attempt,
                "Retries exhausted"
            );
            return Err(MarketError::ServiceUnavailable(format!(
                "{} retries exhausted",
                self.operation
            )));
        }
        if conflicted {
            let backoff = CONFLICT_BACKOFF_MS * u64::from(self.attempt);
            tokio::time::sleep(Duration::from_millis(backoff)).await;
        }
        self.attempt += 1;
        Ok(())
    }
}

impl OrderService {
    pub fn new(
        orders: OrderRepository,
        listings: ListingRepository,
        fee_policy: FeePolicy,
        store_timeout: Duration,
        max_retries: u32,
    ) -> Self {
        Self {
            orders,
            listings,
            fee_policy,
            locks: ListingLocks::new(),
            store_timeout,
            max_retries,
        }
    }

    /// Listings with a placement or cancellation in flight
    pub fn active_locks(&self) -> usize {
        self.locks.len()
    }

    /// Place an order for the authenticated buyer
    ///
    /// Checks, in order: role, listing visible, delivery address, quantity.
    /// No partial fulfillment: the full quantity commits or nothing does.
    pub async fn place(&self, user: &CurrentUser, req: OrderCreate) -> MarketResult<OrderResponse> {
        require_role(user, Role::Buyer)?;
        let buyer = user.account_id()?;

        let listing_id = parse_record_id(LISTING_TABLE, &req.listing_id)
            .ok_or(MarketError::NotFound("Listing"))?;
        let listing = self.load_orderable(&listing_id).await?;

        req.validate().map_err(|e| MarketError::invalid(e.to_string()))?;
        let delivery_address = req.delivery_address.trim().to_string();
        if delivery_address.is_empty() {
            return Err(MarketError::invalid_with(
                ErrorCode::DeliveryAddressRequired,
                "delivery address is required",
            ));
        }
        let quantity = checked_quantity(req.quantity, &listing)?;

        let _guard = self.locks.acquire(&listing_id).await;
        let mut listing = self.load_orderable(&listing_id).await?;
        let mut retries = Retries::new("order placement", self.max_retries);

        loop {
            if quantity > listing.available_quantity {
                return Err(insufficient(req.quantity, &listing));
            }

            let order = self.build_order(&buyer, &listing, quantity, &req, &delivery_address)?;
            let order_id = new_record_id(ORDER_TABLE, 'o');

            let conflicted = match self.try_place(order_id, order).await {
                Ok(Some(placed)) => {
                    tracing::info!(
                        order_id = %placed.id,
                        listing_id = %listing_id,
                        buyer = %user.id,
                        quantity = %milli_to_quantity(quantity),
                        total = %cents_to_decimal(placed.total_price),
                        attempt = retries.attempt(),
                        "Order placed"
                    );
                    return Ok(placed.into());
                }
                Ok(None) => {
                    tracing::debug!(
                        listing_id = %listing_id,
                        attempt = retries.attempt(),
                        "Stock claim rejected, re-reading listing"
                    );
                    false
                }
                Err(MarketError::ConcurrencyConflict) => {
                    tracing::warn!(
                        listing_id = %listing_id,
                        attempt = retries.attempt(),
                        "Order placement conflicted"
                    );
                    true
                }
                Err(e) => return Err(e),
            };

            retries.spend(conflicted).await?;
            listing = self.load_orderable(&listing_id).await?;
        }
    }

    /// One transactional attempt; `None` when the guarded claim matched nothing
    async fn try_place(
        &self,
        order_id: RecordId,
        order: NewOrder,
    ) -> MarketResult<Option<PurchaseOrder>> {
        let outcome = bounded(self.store_timeout, async {
            Ok::<_, MarketError>(self.orders.place_atomically(order_id, order).await)
        })
        .await?;

        match outcome {
            Ok(placed) => Ok(Some(placed)),
            Err(PlacementError::Rejected) => Ok(None),
            Err(PlacementError::Conflict(_)) => Err(MarketError::ConcurrencyConflict),
            Err(PlacementError::Store(e)) => Err(e.into()),
        }
    }

    /// Price the order at the listing's current unit price
    fn build_order(
        &self,
        buyer: &RecordId,
        listing: &Listing,
        quantity: i64,
        req: &OrderCreate,
        delivery_address: &str,
    ) -> MarketResult<NewOrder> {
        let unit_price = cents_to_decimal(listing.unit_price);
        let amount = milli_to_quantity(quantity);
        let payout = self.fee_policy.compute_payout(unit_price, amount)?;
        let total = pricing::order_total(unit_price, amount);

        Ok(NewOrder {
            buyer: buyer.clone(),
            listing: listing.id.clone(),
            item_name: listing.item_name.clone(),
            quantity,
            unit_price: listing.unit_price,
            total_price: amount_to_cents(total)?,
            platform_fee: amount_to_cents(payout.platform_fee_total)?,
            payment_method: req.payment_method,
            delivery_address: delivery_address.to_string(),
            status: OrderStatus::Completed,
            created_at: now_millis(),
        })
    }

    /// Listings that are not approved do not exist as far as buyers can tell
    async fn load_orderable(&self, id: &RecordId) -> MarketResult<Listing> {
        bounded(self.store_timeout, self.listings.find_by_id(id))
            .await?
            .filter(|listing| listing.status == ListingStatus::Approved)
            .ok_or(MarketError::NotFound("Listing"))
    }

    /// Cancel a completed order and return its stock
    pub async fn cancel(&self, user: &CurrentUser, raw_id: &str) -> MarketResult<OrderResponse> {
        authorize(user, Operation::CancelOrder)?;
        let order_id = parse_record_id(ORDER_TABLE, raw_id).ok_or(MarketError::NotFound("Order"))?;
        let order = self.find(&order_id).await?;

        if !user.is_admin() && order.buyer != user.account_id()? {
            return Err(MarketError::unauthorized("only the ordering buyer may cancel"));
        }
        if order.status != OrderStatus::Completed {
            return Err(not_cancellable(&order));
        }

        let _guard = self.locks.acquire(&order.listing).await;
        let mut retries = Retries::new("order cancellation", self.max_retries);
        loop {
            let outcome = bounded(self.store_timeout, async {
                Ok::<_, MarketError>(self.orders.cancel_atomically(&order).await)
            })
            .await?;

            match outcome {
                Ok(cancelled) => {
                    tracing::info!(
                        order_id = %cancelled.id,
                        listing_id = %cancelled.listing,
                        actor = %user.id,
                        quantity = %milli_to_quantity(cancelled.quantity),
                        "Order cancelled, stock restored"
                    );
                    return Ok(cancelled.into());
                }
                Err(PlacementError::Rejected) => return Err(not_cancellable(&order)),
                Err(PlacementError::Conflict(_)) => {
                    tracing::warn!(
                        order_id = %order.id,
                        attempt = retries.attempt(),
                        "Order cancellation conflicted"
                    );
                    retries.spend(true).await?;
                }
                Err(PlacementError::Store(e)) => return Err(e.into()),
            }
        }
    }

    /// The buyer's own orders, newest first
    pub async fn mine(&self, user: &CurrentUser) -> MarketResult<Vec<OrderResponse>> {
        authorize(user, Operation::ViewOwnOrders)?;
        let buyer = user.account_id()?;
        let orders = bounded(self.store_timeout, self.orders.find_by_buyer(&buyer)).await?;
        Ok(orders.into_iter().map(OrderResponse::from).collect())
    }

    /// Orders against the producer's listings, newest first
    pub async fn received(&self, user: &CurrentUser) -> MarketResult<Vec<OrderResponse>> {
        authorize(user, Operation::ViewReceivedOrders)?;
        let producer = user.account_id()?;
        let orders = bounded(self.store_timeout, self.orders.find_for_producer(&producer)).await?;
        Ok(orders.into_iter().map(OrderResponse::from).collect())
    }

    async fn find(&self, id: &RecordId) -> MarketResult<PurchaseOrder> {
        bounded(self.store_timeout, self.orders.find_by_id(id))
            .await?
            .ok_or(MarketError::NotFound("Order"))
    }
}

/// Requested quantity in thousandths
///
/// Anything outside `(0, available]` is short stock; only excess precision is
/// an invalid argument.
fn checked_quantity(requested: Decimal, listing: &Listing) -> MarketResult<i64> {
    if requested <= Decimal::ZERO || requested > milli_to_quantity(listing.available_quantity) {
        return Err(insufficient(requested, listing));
    }
    quantity_to_milli(requested)
}

fn insufficient(requested: Decimal, listing: &Listing) -> MarketError {
    MarketError::InsufficientStock {
        requested,
        available: milli_to_quantity(listing.available_quantity),
    }
}

fn not_cancellable(order: &PurchaseOrder) -> MarketError {
    MarketError::invalid_with(
        ErrorCode::OrderNotCancellable,
        format!("order {} is {}", order.id, order.status.as_str()),
    )
}

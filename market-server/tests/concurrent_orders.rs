//! Stock can never be oversold, with or without the in-process lock

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{TestMarket, dec, order_for};
use market_server::MarketError;
use market_server::db::models::{
    LISTING_TABLE, NewOrder, ORDER_TABLE, new_record_id, now_millis, parse_record_id,
};
use market_server::db::repository::{ListingRepository, OrderRepository, PlacementError};
use market_server::orders::OrderService;
use shared::models::{OrderStatus, PaymentMethod, Role};
use surrealdb::RecordId;

fn raw_order(buyer: &str, listing: &RecordId, quantity_milli: i64, unit_cents: i64) -> NewOrder {
    NewOrder {
        buyer: buyer.parse().unwrap(),
        listing: listing.clone(),
        item_name: "Tomato".into(),
        quantity: quantity_milli,
        unit_price: unit_cents,
        total_price: unit_cents * quantity_milli / 1000,
        platform_fee: 0,
        payment_method: PaymentMethod::CashOnDelivery,
        delivery_address: "12 Orchard Lane".into(),
        status: OrderStatus::Completed,
        created_at: now_millis(),
    }
}

#[tokio::test]
async fn two_orders_of_eight_against_ten() {
    let market = TestMarket::new().await;
    let admin = market.admin().await;
    let alice = market.register("alice@farm.test", "Alice", Role::Buyer).await;
    let carol = market.register("carol@farm.test", "Carol", Role::Buyer).await;
    let bob = market.register("bob@farm.test", "Bob", Role::Producer).await;
    let listing = market
        .approved_listing(&bob, &admin, "Tomato", "40", "10")
        .await;

    let orders = market.state.orders.clone();
    let (a, c) = tokio::join!(
        orders.place(&alice, order_for(&listing.id, "8")),
        orders.place(&carol, order_for(&listing.id, "8")),
    );

    let outcomes = [a, c];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let failure = outcomes.into_iter().find_map(Result::err).unwrap();
    assert_eq!(
        failure,
        MarketError::InsufficientStock {
            requested: dec("8"),
            available: dec("2"),
        }
    );
    assert_eq!(market.available(&listing.id).await, dec("2"));
}

#[tokio::test]
async fn many_buyers_drain_stock_exactly() {
    let market = TestMarket::new().await;
    let admin = market.admin().await;
    let bob = market.register("bob@farm.test", "Bob", Role::Producer).await;
    let listing = market
        .approved_listing(&bob, &admin, "Potato", "1.20", "10")
        .await;

    let mut buyers = Vec::new();
    for i in 0..20 {
        buyers.push(
            market
                .register(&format!("buyer{}@farm.test", i), &format!("Buyer {}", i), Role::Buyer)
                .await,
        );
    }

    let orders = Arc::clone(&market.state.orders);
    let mut handles = Vec::new();
    for buyer in buyers {
        let orders = Arc::clone(&orders);
        let listing_id = listing.id.clone();
        handles.push(tokio::spawn(async move {
            orders.place(&buyer, order_for(&listing_id, "1")).await
        }));
    }

    let mut placed = 0;
    let mut short = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(MarketError::InsufficientStock { .. }) => short += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(placed, 10);
    assert_eq!(short, 10);
    assert_eq!(
        market.state.listings.get(Some(&admin), &listing.id).await.unwrap().available_quantity,
        dec("0")
    );
}

/// The conditional update alone must hold the line when no lock is taken
#[tokio::test]
async fn store_transaction_rejects_the_second_claim() {
    let market = TestMarket::new().await;
    let admin = market.admin().await;
    let alice = market.register("alice@farm.test", "Alice", Role::Buyer).await;
    let carol = market.register("carol@farm.test", "Carol", Role::Buyer).await;
    let bob = market.register("bob@farm.test", "Bob", Role::Producer).await;
    let listing = market
        .approved_listing(&bob, &admin, "Tomato", "40", "10")
        .await;
    let listing_id = parse_record_id(LISTING_TABLE, &listing.id).unwrap();

    let repo = OrderRepository::new(market.state.db.handle());
    let (a, c) = tokio::join!(
        repo.place_atomically(
            new_record_id(ORDER_TABLE, 'o'),
            raw_order(&alice.id, &listing_id, 8000, 4000),
        ),
        repo.place_atomically(
            new_record_id(ORDER_TABLE, 'o'),
            raw_order(&carol.id, &listing_id, 8000, 4000),
        ),
    );

    let outcomes = [a, c];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|r| matches!(
        r,
        Err(PlacementError::Rejected) | Err(PlacementError::Conflict(_))
    )));
    assert_eq!(market.available(&listing.id).await, dec("2"));
}

#[tokio::test]
async fn stale_price_is_rejected_by_the_store() {
    let market = TestMarket::new().await;
    let admin = market.admin().await;
    let alice = market.register("alice@farm.test", "Alice", Role::Buyer).await;
    let bob = market.register("bob@farm.test", "Bob", Role::Producer).await;
    let listing = market
        .approved_listing(&bob, &admin, "Tomato", "40", "10")
        .await;
    let listing_id = parse_record_id(LISTING_TABLE, &listing.id).unwrap();

    let repo = OrderRepository::new(market.state.db.handle());
    let result = repo
        .place_atomically(
            new_record_id(ORDER_TABLE, 'o'),
            raw_order(&alice.id, &listing_id, 1000, 3900),
        )
        .await;
    assert!(matches!(result, Err(PlacementError::Rejected)));
    assert_eq!(market.available(&listing.id).await, dec("10"));
}

/// A failing order write inside the transaction must roll back the claim
#[tokio::test]
async fn failed_order_write_leaves_stock_untouched() {
    let market = TestMarket::new().await;
    let admin = market.admin().await;
    let alice = market.register("alice@farm.test", "Alice", Role::Buyer).await;
    let bob = market.register("bob@farm.test", "Bob", Role::Producer).await;
    let listing = market
        .approved_listing(&bob, &admin, "Tomato", "40", "10")
        .await;
    let listing_id = parse_record_id(LISTING_TABLE, &listing.id).unwrap();

    let repo = OrderRepository::new(market.state.db.handle());
    let taken_id = new_record_id(ORDER_TABLE, 'o');
    repo.place_atomically(taken_id.clone(), raw_order(&alice.id, &listing_id, 1000, 4000))
        .await
        .unwrap();
    assert_eq!(market.available(&listing.id).await, dec("9"));

    // Same order id again: the claim succeeds, the CREATE fails, nothing commits
    let result = repo
        .place_atomically(taken_id, raw_order(&alice.id, &listing_id, 5000, 4000))
        .await;
    assert!(matches!(result, Err(PlacementError::Store(_))));
    assert_eq!(market.available(&listing.id).await, dec("9"));
    assert_eq!(market.state.orders.mine(&alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn listing_locks_are_released_after_each_order() {
    let market = TestMarket::new().await;
    let admin = market.admin().await;
    let alice = market.register("alice@farm.test", "Alice", Role::Buyer).await;
    let bob = market.register("bob@farm.test", "Bob", Role::Producer).await;

    let mut listings = Vec::new();
    for item in ["Tomato", "Potato", "Leek"] {
        listings.push(market.approved_listing(&bob, &admin, item, "2", "10").await);
    }

    let orders = &market.state.orders;
    for listing in &listings {
        orders.place(&alice, order_for(&listing.id, "1")).await.unwrap();
    }
    let err = orders
        .place(&alice, order_for(&listings[0].id, "50"))
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::InsufficientStock { .. }));
    let err = orders
        .place(&alice, order_for("listing:lnope", "1"))
        .await
        .unwrap_err();
    assert_eq!(err, MarketError::NotFound("Listing"));

    let mine = orders.mine(&alice).await.unwrap();
    orders.cancel(&alice, &mine[0].id).await.unwrap();

    assert_eq!(orders.active_locks(), 0);
}

/// A store that never answers in time surfaces as unavailable and changes nothing
#[tokio::test]
async fn store_timeout_during_placement_is_unavailable() {
    let market = TestMarket::new().await;
    let admin = market.admin().await;
    let alice = market.register("alice@farm.test", "Alice", Role::Buyer).await;
    let bob = market.register("bob@farm.test", "Bob", Role::Producer).await;
    let listing = market
        .approved_listing(&bob, &admin, "Tomato", "40", "10")
        .await;

    let handle = market.state.db.handle();
    let impatient = OrderService::new(
        OrderRepository::new(handle.clone()),
        ListingRepository::new(handle),
        market.config.fee_policy,
        Duration::ZERO,
        0,
    );

    let err = impatient
        .place(&alice, order_for(&listing.id, "2"))
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::ServiceUnavailable(_)));
    assert_eq!(impatient.active_locks(), 0);
    assert_eq!(market.available(&listing.id).await, dec("10"));
    assert!(market.state.orders.mine(&alice).await.unwrap().is_empty());
}

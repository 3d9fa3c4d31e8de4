//! On-disk store survives a restart

mod common;

use std::time::Duration;

use common::{ADMIN_EMAIL, ADMIN_PASSWORD, dec, order_for, test_config};
use market_server::auth::CurrentUser;
use market_server::core::ServerState;
use shared::models::{ListingCreate, ListingStatus, LoginRequest, RegisterRequest, Role};

async fn login(state: &ServerState, email: &str, password: &str) -> CurrentUser {
    let response = state
        .accounts
        .login(LoginRequest {
            email: email.into(),
            password: password.into(),
        })
        .await
        .unwrap();
    let claims = state.jwt_service.validate_token(&response.token).unwrap();
    CurrentUser::try_from(claims).unwrap()
}

#[tokio::test]
async fn orders_and_stock_survive_restart() {
    let work_dir = tempfile::tempdir().unwrap();
    let config = test_config(&work_dir);

    let listing_id = {
        let state = ServerState::initialize(&config).await.unwrap();
        let admin = login(&state, ADMIN_EMAIL, ADMIN_PASSWORD).await;
        for (email, name, role) in [
            ("alice@farm.test", "Alice", Role::Buyer),
            ("bob@farm.test", "Bob", Role::Producer),
        ] {
            state
                .accounts
                .register(RegisterRequest {
                    email: email.into(),
                    password: "password123".into(),
                    display_name: name.into(),
                    role: Some(role),
                })
                .await
                .unwrap();
        }
        let alice = login(&state, "alice@farm.test", "password123").await;
        let bob = login(&state, "bob@farm.test", "password123").await;

        let created = state
            .listings
            .create(
                &bob,
                ListingCreate {
                    item_name: "Tomato".into(),
                    unit_price: dec("40"),
                    quantity: dec("20"),
                    image_url: None,
                },
            )
            .await
            .unwrap();
        state
            .listings
            .moderate(&admin, &created.listing.id, ListingStatus::Approved)
            .await
            .unwrap();
        state
            .orders
            .place(&alice, order_for(&created.listing.id, "5"))
            .await
            .unwrap();

        state.db.clone().shutdown().await;
        created.listing.id
    };

    tokio::time::sleep(Duration::from_millis(200)).await;

    // Bootstrap runs again and must not duplicate the administrator
    let state = ServerState::initialize(&config).await.unwrap();
    let admin = login(&state, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let accounts = state.accounts.list(&admin).await.unwrap();
    assert_eq!(accounts.len(), 3);

    let listing = state.listings.get(None, &listing_id).await.unwrap();
    assert_eq!(listing.available_quantity, dec("15"));

    let alice = login(&state, "alice@farm.test", "password123").await;
    let orders = state.orders.mine(&alice).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].total_price, dec("200"));
}

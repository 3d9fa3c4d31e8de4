//! Shared fixtures: an in-memory market with a bootstrap administrator

#![allow(dead_code)]

use std::str::FromStr;

use market_server::auth::CurrentUser;
use market_server::core::{AdminBootstrap, Config, ServerState};
use market_server::db::DbService;
use rust_decimal::Decimal;
use shared::models::{
    ListingCreate, ListingResponse, ListingStatus, LoginRequest, OrderCreate, RegisterRequest,
    Role,
};
use tempfile::TempDir;

pub const JWT_SECRET: &str = "test-secret-that-is-at-least-32-characters-long";
pub const ADMIN_EMAIL: &str = "admin@market.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestMarket {
    pub state: ServerState,
    pub config: Config,
    _work_dir: TempDir,
}

pub fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap()
}

pub fn test_config(work_dir: &TempDir) -> Config {
    let mut config = Config::with_overrides(work_dir.path().to_string_lossy(), JWT_SECRET);
    config.admin = Some(AdminBootstrap {
        email: ADMIN_EMAIL.into(),
        password: ADMIN_PASSWORD.into(),
        display_name: "Admin".into(),
    });
    config
}

impl TestMarket {
    pub async fn new() -> Self {
        let work_dir = tempfile::tempdir().unwrap();
        let config = test_config(&work_dir);
        config.ensure_work_dir_structure().unwrap();
        Self::with_config(config, work_dir).await
    }

    pub async fn with_config(config: Config, work_dir: TempDir) -> Self {
        let db = DbService::in_memory().await.unwrap();
        let state = ServerState::with_db(config.clone(), db).await.unwrap();
        Self {
            state,
            config,
            _work_dir: work_dir,
        }
    }

    /// Register and return the identity a token for this account would carry
    pub async fn register(&self, email: &str, name: &str, role: Role) -> CurrentUser {
        let account = self
            .state
            .accounts
            .register(RegisterRequest {
                email: email.into(),
                password: "password123".into(),
                display_name: name.into(),
                role: Some(role),
            })
            .await
            .unwrap();
        CurrentUser {
            id: account.id,
            display_name: account.display_name,
            role: account.role,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        self.state
            .accounts
            .login(LoginRequest {
                email: email.into(),
                password: password.into(),
            })
            .await
            .unwrap()
            .token
    }

    /// Identity behind a token, exactly as the middleware rebuilds it
    pub fn identity(&self, token: &str) -> CurrentUser {
        let claims = self.state.jwt_service.validate_token(token).unwrap();
        CurrentUser::try_from(claims).unwrap()
    }

    pub async fn admin(&self) -> CurrentUser {
        let token = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        self.identity(&token)
    }

    /// Create a listing and approve it
    pub async fn approved_listing(
        &self,
        producer: &CurrentUser,
        admin: &CurrentUser,
        item: &str,
        price: &str,
        quantity: &str,
    ) -> ListingResponse {
        let created = self
            .state
            .listings
            .create(
                producer,
                ListingCreate {
                    item_name: item.into(),
                    unit_price: dec(price),
                    quantity: dec(quantity),
                    image_url: None,
                },
            )
            .await
            .unwrap();
        self.state
            .listings
            .moderate(admin, &created.listing.id, ListingStatus::Approved)
            .await
            .unwrap()
    }

    pub async fn available(&self, listing_id: &str) -> Decimal {
        self.state
            .listings
            .get(None, listing_id)
            .await
            .unwrap()
            .available_quantity
    }
}

pub fn order_for(listing_id: &str, quantity: &str) -> OrderCreate {
    OrderCreate {
        listing_id: listing_id.into(),
        quantity: dec(quantity),
        payment_method: Default::default(),
        delivery_address: "12 Orchard Lane".into(),
    }
}

use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::{Config, MarketError, MarketResult};
use crate::db::DbService;
use crate::db::repository::{
    AccountRepository, ListingRepository, OrderRepository, ReportRepository,
};
use crate::orders::OrderService;
use crate::reporting::ReportingService;
use crate::services::{AccountService, ListingService, PlaceholderAnalyzer};

/// Server state, shared by every handler
///
/// Cloning is cheap: every field is an `Arc` or a handle.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | immutable configuration |
/// | db | embedded SurrealDB handle |
/// | jwt_service | token issuance and verification |
/// | accounts | registration, login, account administration |
/// | listings | listing creation, moderation, marketplace |
/// | orders | inventory-aware placement and cancellation |
/// | reporting | administrator summary |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub accounts: Arc<AccountService>,
    pub listings: Arc<ListingService>,
    pub orders: Arc<OrderService>,
    pub reporting: Arc<ReportingService>,
}

impl ServerState {
    /// Initialize server state
    ///
    /// 1. Ensure the work dir layout exists
    /// 2. Open the store (with retry/backoff) and apply the schema
    /// 3. Build services and bootstrap the administrator if configured
    pub async fn initialize(config: &Config) -> MarketResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| MarketError::Internal(format!("Failed to create work dir: {}", e)))?;

        let db_path = config.database_dir().join("market.db");
        let db = DbService::open(
            &db_path,
            config.db_connect_attempts,
            config.db_retry_backoff,
        )
        .await?;

        Self::with_db(config.clone(), db).await
    }

    /// Build state around an already-open store
    pub async fn with_db(config: Config, db: DbService) -> MarketResult<Self> {
        let handle = db.handle();
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let accounts = AccountService::new(
            AccountRepository::new(handle.clone()),
            jwt_service.clone(),
            config.store_timeout,
        );
        let listings = ListingService::new(
            ListingRepository::new(handle.clone()),
            config.fee_policy,
            config.min_listing_quantity,
            config.auto_approve_threshold,
            Arc::new(PlaceholderAnalyzer::new(config.quality_placeholder_score)),
            config.store_timeout,
        );
        let orders = OrderService::new(
            OrderRepository::new(handle.clone()),
            ListingRepository::new(handle.clone()),
            config.fee_policy,
            config.store_timeout,
            config.order_max_retries,
        );
        let reporting = ReportingService::new(
            ReportRepository::new(handle),
            config.recent_activity_limit,
            config.store_timeout,
        );

        if let Some(admin) = &config.admin {
            accounts.bootstrap_admin(admin).await?;
        }

        Ok(Self {
            config: Arc::new(config),
            db,
            jwt_service,
            accounts: Arc::new(accounts),
            listings: Arc::new(listings),
            orders: Arc::new(orders),
            reporting: Arc::new(reporting),
        })
    }
}

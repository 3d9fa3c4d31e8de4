//! Listing service
//!
//! Creation prices the listing and scores its image; moderation and the
//! marketplace views read through the repository.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use shared::ErrorCode;
use shared::models::{
    ListingCreate, ListingCreated, ListingResponse, ListingStatus, PricingQuote,
    PricingQuoteRequest,
};
use validator::Validate;

use crate::auth::{CurrentUser, Operation, authorize};
use crate::core::{MarketError, MarketResult};
use crate::db::bounded;
use crate::db::models::{LISTING_TABLE, Listing, NewListing, now_millis, parse_record_id};
use crate::db::repository::ListingRepository;
use crate::pricing::money::{amount_to_cents, price_to_cents, quantity_to_milli};
use crate::pricing::{self, FeePolicy};
use crate::services::quality::{QualityAnalyzer, auto_approves};

#[derive(Clone)]
pub struct ListingService {
    repo: ListingRepository,
    fee_policy: FeePolicy,
    min_quantity: Decimal,
    auto_approve_threshold: u8,
    analyzer: Arc<dyn QualityAnalyzer>,
    store_timeout: Duration,
}

impl ListingService {
    pub fn new(
        repo: ListingRepository,
        fee_policy: FeePolicy,
        min_quantity: Decimal,
        auto_approve_threshold: u8,
        analyzer: Arc<dyn QualityAnalyzer>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            fee_policy,
            min_quantity,
            auto_approve_threshold,
            analyzer,
            store_timeout,
        }
    }

    /// Fee preview for a price and quantity; no store access
    pub fn quote(&self, req: &PricingQuoteRequest) -> MarketResult<PricingQuote> {
        price_to_cents(req.unit_price)?;
        quantity_to_milli(req.quantity)?;
        pricing::quote(&self.fee_policy, req.unit_price, req.quantity)
    }

    pub async fn create(
        &self,
        user: &CurrentUser,
        req: ListingCreate,
    ) -> MarketResult<ListingCreated> {
        authorize(user, Operation::CreateListing)?;
        req.validate().map_err(|e| MarketError::invalid(e.to_string()))?;

        let item_name = req.item_name.trim();
        if item_name.is_empty() {
            return Err(MarketError::invalid("item name must not be blank"));
        }
        let unit_price = price_to_cents(req.unit_price)?;
        let quantity = quantity_to_milli(req.quantity)?;
        if req.quantity < self.min_quantity {
            return Err(MarketError::invalid_with(
                ErrorCode::ListingBelowMinimumQuantity,
                format!("minimum listing quantity is {}", self.min_quantity),
            ));
        }

        let quote = pricing::quote(&self.fee_policy, req.unit_price, req.quantity)?;
        let producer_payout = amount_to_cents(quote.producer_payout_per_unit)?;

        let image_url = req
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        let quality_score = self.analyzer.analyze(image_url.as_deref()).await;
        let status = if auto_approves(quality_score, self.auto_approve_threshold) {
            ListingStatus::Approved
        } else {
            ListingStatus::Pending
        };

        let data = NewListing {
            producer: user.account_id()?,
            item_name: item_name.to_string(),
            unit_price,
            producer_payout,
            available_quantity: quantity,
            initial_quantity: quantity,
            image_url,
            quality_score: quality_score.map(i64::from),
            status,
            created_at: now_millis(),
        };

        let listing = bounded(self.store_timeout, self.repo.create(data)).await?;
        tracing::info!(
            listing_id = %listing.id,
            producer = %user.id,
            status = listing.status.as_str(),
            quality_score = ?quality_score,
            "Listing created"
        );

        Ok(ListingCreated {
            listing: listing.into(),
            pricing: quote,
        })
    }

    /// Approved, in-stock listings, newest first
    pub async fn marketplace(&self) -> MarketResult<Vec<ListingResponse>> {
        let listings = bounded(self.store_timeout, self.repo.find_marketplace()).await?;
        Ok(listings.into_iter().map(ListingResponse::from).collect())
    }

    /// A single listing; unapproved listings are visible only to their
    /// producer and administrators
    pub async fn get(
        &self,
        viewer: Option<&CurrentUser>,
        raw_id: &str,
    ) -> MarketResult<ListingResponse> {
        let listing = self.find(raw_id).await?;
        let visible = listing.status == ListingStatus::Approved
            || viewer.is_some_and(|user| {
                user.is_admin() || user.id == listing.producer.to_string()
            });
        if !visible {
            return Err(MarketError::NotFound("Listing"));
        }
        Ok(listing.into())
    }

    pub async fn mine(&self, user: &CurrentUser) -> MarketResult<Vec<ListingResponse>> {
        authorize(user, Operation::ViewOwnListings)?;
        let producer = user.account_id()?;
        let listings = bounded(self.store_timeout, self.repo.find_by_producer(&producer)).await?;
        Ok(listings.into_iter().map(ListingResponse::from).collect())
    }

    /// Moderation queue, newest first
    pub async fn pending(&self, user: &CurrentUser) -> MarketResult<Vec<ListingResponse>> {
        authorize(user, Operation::ViewPendingListings)?;
        let listings = bounded(
            self.store_timeout,
            self.repo.find_by_status(ListingStatus::Pending),
        )
        .await?;
        Ok(listings.into_iter().map(ListingResponse::from).collect())
    }

    pub async fn moderate(
        &self,
        user: &CurrentUser,
        raw_id: &str,
        status: ListingStatus,
    ) -> MarketResult<ListingResponse> {
        authorize(user, Operation::ModerateListing)?;
        if status == ListingStatus::Pending {
            return Err(MarketError::invalid("moderation sets approved or refused"));
        }
        let listing = self.find(raw_id).await?;

        let updated = bounded(self.store_timeout, self.repo.set_status(&listing.id, status))
            .await
            .map_err(|e| match e {
                MarketError::NotFound(_) => MarketError::NotFound("Listing"),
                other => other,
            })?;
        tracing::info!(
            listing_id = %updated.id,
            moderator = %user.id,
            from = listing.status.as_str(),
            to = status.as_str(),
            "Listing moderated"
        );
        Ok(updated.into())
    }

    async fn find(&self, raw_id: &str) -> MarketResult<Listing> {
        let id = parse_record_id(LISTING_TABLE, raw_id).ok_or(MarketError::NotFound("Listing"))?;
        bounded(self.store_timeout, self.repo.find_by_id(&id))
            .await?
            .ok_or(MarketError::NotFound("Listing"))
    }
}

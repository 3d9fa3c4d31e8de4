//! Listing Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{LISTING_TABLE, Listing, NewListing, new_record_id};
use shared::models::ListingStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Listing columns plus the producer's display name
const SELECT_WITH_PRODUCER: &str = "SELECT *, producer.display_name AS producer_name FROM listing";

#[derive(Clone)]
pub struct ListingRepository {
    base: BaseRepository,
}

impl ListingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, data: NewListing) -> RepoResult<Listing> {
        let id = new_record_id(LISTING_TABLE, 'l');
        let created: Option<Listing> = self.base.db().create(id.clone()).content(data).await?;
        if created.is_none() {
            return Err(RepoError::Database("Failed to create listing".to_string()));
        }
        self.find_by_id(&id)
            .await?
            .ok_or_else(|| RepoError::Database("Created listing vanished".to_string()))
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Listing>> {
        let mut result = self
            .base
            .db()
            .query(format!("{} WHERE id = $id", SELECT_WITH_PRODUCER))
            .bind(("id", id.clone()))
            .await?;
        let listings: Vec<Listing> = result.take(0)?;
        Ok(listings.into_iter().next())
    }

    /// Public marketplace: approved and in stock, newest first
    pub async fn find_marketplace(&self) -> RepoResult<Vec<Listing>> {
        let listings: Vec<Listing> = self
            .base
            .db()
            .query(format!(
                "{} WHERE status = 'approved' AND available_quantity > 0 ORDER BY created_at DESC",
                SELECT_WITH_PRODUCER
            ))
            .await?
            .take(0)?;
        Ok(listings)
    }

    /// A producer's own listings in every status, newest first
    pub async fn find_by_producer(&self, producer: &RecordId) -> RepoResult<Vec<Listing>> {
        let listings: Vec<Listing> = self
            .base
            .db()
            .query(format!(
                "{} WHERE producer = $producer ORDER BY created_at DESC",
                SELECT_WITH_PRODUCER
            ))
            .bind(("producer", producer.clone()))
            .await?
            .take(0)?;
        Ok(listings)
    }

    /// Moderation queue, newest first
    pub async fn find_by_status(&self, status: ListingStatus) -> RepoResult<Vec<Listing>> {
        let listings: Vec<Listing> = self
            .base
            .db()
            .query(format!(
                "{} WHERE status = $status ORDER BY created_at DESC",
                SELECT_WITH_PRODUCER
            ))
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(listings)
    }

    pub async fn set_status(&self, id: &RecordId, status: ListingStatus) -> RepoResult<Listing> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET status = $status RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("status", status))
            .await?;
        let updated: Option<Listing> = result.take(0)?;
        if updated.is_none() {
            return Err(RepoError::NotFound(format!("Listing {} not found", id)));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Listing {} not found", id)))
    }
}

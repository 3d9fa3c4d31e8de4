//! Report Repository
//!
//! Grouped counts and recent rows for the administrator dashboard. Always
//! computed from current state.

use super::{BaseRepository, RepoResult};
use crate::db::models::{Listing, PurchaseOrder};
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Debug, Clone, Deserialize)]
pub struct GroupCount {
    #[serde(alias = "role", alias = "status")]
    pub key: String,
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderTotals {
    pub status: String,
    pub total: i64,
    /// Cents
    #[serde(default)]
    pub revenue: Option<i64>,
    /// Cents
    #[serde(default)]
    pub fees: Option<i64>,
}

#[derive(Clone)]
pub struct ReportRepository {
    base: BaseRepository,
}

impl ReportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn accounts_by_role(&self) -> RepoResult<Vec<GroupCount>> {
        let rows: Vec<GroupCount> = self
            .base
            .db()
            .query("SELECT role, count() AS total FROM account GROUP BY role")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn listings_by_status(&self) -> RepoResult<Vec<GroupCount>> {
        let rows: Vec<GroupCount> = self
            .base
            .db()
            .query("SELECT status, count() AS total FROM listing GROUP BY status")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn orders_by_status(&self) -> RepoResult<Vec<OrderTotals>> {
        let rows: Vec<OrderTotals> = self
            .base
            .db()
            .query(
                "SELECT status, count() AS total, math::sum(total_price) AS revenue, \
                 math::sum(platform_fee) AS fees FROM purchase_order GROUP BY status",
            )
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Most recent orders with buyer names; unfiltered so LIMIT is safe
    pub async fn recent_orders(&self, limit: usize) -> RepoResult<Vec<PurchaseOrder>> {
        let rows: Vec<PurchaseOrder> = self
            .base
            .db()
            .query(
                "SELECT *, buyer.display_name AS buyer_name FROM purchase_order \
                 ORDER BY created_at DESC LIMIT $limit",
            )
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Most recent listings with producer names; unfiltered so LIMIT is safe
    pub async fn recent_listings(&self, limit: usize) -> RepoResult<Vec<Listing>> {
        let rows: Vec<Listing> = self
            .base
            .db()
            .query(
                "SELECT *, producer.display_name AS producer_name FROM listing \
                 ORDER BY created_at DESC LIMIT $limit",
            )
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;
        Ok(rows)
    }
}

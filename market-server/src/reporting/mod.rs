//! Administrator reporting
//!
//! Counts, revenue and a merged activity feed, computed on demand from the
//! store.

use std::time::Duration;

use rust_decimal::Decimal;
use shared::models::{
    ActivityEntry, ActivityKind, AdminSummary, ListingCounts, OrderCounts, RoleCounts,
};

use crate::auth::{CurrentUser, Operation, authorize};
use crate::core::MarketResult;
use crate::db::bounded;
use crate::db::models::{Listing, PurchaseOrder};
use crate::db::repository::ReportRepository;
use crate::db::repository::report::{GroupCount, OrderTotals};
use crate::pricing::money::{cents_to_decimal, milli_to_quantity};

#[derive(Clone)]
pub struct ReportingService {
    repo: ReportRepository,
    recent_limit: usize,
    store_timeout: Duration,
}

impl ReportingService {
    pub fn new(repo: ReportRepository, recent_limit: usize, store_timeout: Duration) -> Self {
        Self {
            repo,
            recent_limit,
            store_timeout,
        }
    }

    pub async fn summary(&self, user: &CurrentUser) -> MarketResult<AdminSummary> {
        authorize(user, Operation::ViewReports)?;
        let limit = self.recent_limit;

        let (roles, listings, orders, recent_orders, recent_listings) = tokio::try_join!(
            bounded(self.store_timeout, self.repo.accounts_by_role()),
            bounded(self.store_timeout, self.repo.listings_by_status()),
            bounded(self.store_timeout, self.repo.orders_by_status()),
            bounded(self.store_timeout, self.repo.recent_orders(limit)),
            bounded(self.store_timeout, self.repo.recent_listings(limit)),
        )?;

        let (order_counts, total_revenue, total_fees) = order_totals(&orders);
        let recent_activity = merge_activity(
            recent_orders.into_iter().map(order_activity).collect(),
            recent_listings.into_iter().map(listing_activity).collect(),
            limit,
        );

        Ok(AdminSummary {
            accounts: role_counts(&roles),
            listings: listing_counts(&listings),
            orders: order_counts,
            total_revenue,
            total_platform_fee_collected: total_fees,
            recent_activity,
        })
    }
}

fn count(total: i64) -> u64 {
    u64::try_from(total).unwrap_or(0)
}

fn role_counts(rows: &[GroupCount]) -> RoleCounts {
    let mut counts = RoleCounts::default();
    for row in rows {
        match row.key.as_str() {
            "producer" => counts.producers += count(row.total),
            "buyer" => counts.buyers += count(row.total),
            "administrator" => counts.administrators += count(row.total),
            other => tracing::warn!(role = other, "Unknown role in account table"),
        }
    }
    counts
}

fn listing_counts(rows: &[GroupCount]) -> ListingCounts {
    let mut counts = ListingCounts::default();
    for row in rows {
        match row.key.as_str() {
            "pending" => counts.pending += count(row.total),
            "approved" => counts.approved += count(row.total),
            "refused" => counts.refused += count(row.total),
            other => tracing::warn!(status = other, "Unknown listing status"),
        }
    }
    counts
}

/// Revenue and fees count completed orders only
fn order_totals(rows: &[OrderTotals]) -> (OrderCounts, Decimal, Decimal) {
    let mut counts = OrderCounts::default();
    let mut revenue = 0i64;
    let mut fees = 0i64;
    for row in rows {
        match row.status.as_str() {
            "completed" => {
                counts.completed += count(row.total);
                revenue += row.revenue.unwrap_or(0);
                fees += row.fees.unwrap_or(0);
            }
            "cancelled" => counts.cancelled += count(row.total),
            other => tracing::warn!(status = other, "Unknown order status"),
        }
    }
    (counts, cents_to_decimal(revenue), cents_to_decimal(fees))
}

fn order_activity(order: PurchaseOrder) -> ActivityEntry {
    let who = order
        .buyer_name
        .clone()
        .unwrap_or_else(|| order.buyer.to_string());
    ActivityEntry {
        kind: ActivityKind::Order,
        subject_id: order.id.to_string(),
        detail: format!(
            "{} ordered {} {} ({})",
            who,
            milli_to_quantity(order.quantity),
            order.item_name,
            order.status.as_str()
        ),
        amount: Some(cents_to_decimal(order.total_price)),
        occurred_at: order.created_at,
    }
}

fn listing_activity(listing: Listing) -> ActivityEntry {
    let who = listing
        .producer_name
        .clone()
        .unwrap_or_else(|| listing.producer.to_string());
    ActivityEntry {
        kind: ActivityKind::Listing,
        subject_id: listing.id.to_string(),
        detail: format!(
            "{} listed {} {} ({})",
            who,
            milli_to_quantity(listing.initial_quantity),
            listing.item_name,
            listing.status.as_str()
        ),
        amount: None,
        occurred_at: listing.created_at,
    }
}

/// Newest first, truncated to `limit`
///
/// The sort is stable over orders-then-listings, so at equal timestamps
/// orders come first.
pub fn merge_activity(
    orders: Vec<ActivityEntry>,
    listings: Vec<ActivityEntry>,
    limit: usize,
) -> Vec<ActivityEntry> {
    let mut feed = orders;
    feed.extend(listings);
    feed.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    feed.truncate(limit);
    feed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: ActivityKind, id: &str, at: i64) -> ActivityEntry {
        ActivityEntry {
            kind,
            subject_id: id.to_string(),
            detail: String::new(),
            amount: None,
            occurred_at: at,
        }
    }

    #[test]
    fn merge_sorts_newest_first_and_truncates() {
        let orders = vec![
            entry(ActivityKind::Order, "o3", 30),
            entry(ActivityKind::Order, "o1", 10),
        ];
        let listings = vec![
            entry(ActivityKind::Listing, "l4", 40),
            entry(ActivityKind::Listing, "l2", 20),
        ];
        let feed = merge_activity(orders, listings, 3);
        let ids: Vec<_> = feed.iter().map(|e| e.subject_id.as_str()).collect();
        assert_eq!(ids, vec!["l4", "o3", "l2"]);
    }

    #[test]
    fn merge_puts_orders_first_on_ties() {
        let feed = merge_activity(
            vec![entry(ActivityKind::Order, "o1", 10)],
            vec![entry(ActivityKind::Listing, "l1", 10)],
            10,
        );
        assert_eq!(feed[0].kind, ActivityKind::Order);
        assert_eq!(feed[1].kind, ActivityKind::Listing);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert!(merge_activity(Vec::new(), Vec::new(), 20).is_empty());
    }

    #[test]
    fn revenue_counts_completed_orders_only() {
        let rows = vec![
            OrderTotals {
                status: "completed".into(),
                total: 2,
                revenue: Some(30_000),
                fees: Some(4_500),
            },
            OrderTotals {
                status: "cancelled".into(),
                total: 1,
                revenue: Some(10_000),
                fees: Some(1_500),
            },
        ];
        let (counts, revenue, fees) = order_totals(&rows);
        assert_eq!(counts, OrderCounts { completed: 2, cancelled: 1 });
        assert_eq!(revenue, Decimal::new(300, 0));
        assert_eq!(fees, Decimal::new(45, 0));
    }

    #[test]
    fn role_counts_fold_rows() {
        let rows = vec![
            GroupCount { key: "producer".into(), total: 2 },
            GroupCount { key: "buyer".into(), total: 5 },
            GroupCount { key: "administrator".into(), total: 1 },
        ];
        assert_eq!(
            role_counts(&rows),
            RoleCounts { producers: 2, buyers: 5, administrators: 1 }
        );
    }
}

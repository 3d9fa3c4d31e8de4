//! Administrator reporting models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Accounts per role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub producers: u64,
    pub buyers: u64,
    pub administrators: u64,
}

/// Listings per moderation status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingCounts {
    pub pending: u64,
    pub approved: u64,
    pub refused: u64,
}

impl ListingCounts {
    pub fn total(&self) -> u64 {
        self.pending + self.approved + self.refused
    }
}

/// Orders per status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCounts {
    pub completed: u64,
    pub cancelled: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Order,
    Listing,
}

/// One entry of the merged activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub subject_id: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// Unix millis
    pub occurred_at: i64,
}

/// Administrator dashboard summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSummary {
    pub accounts: RoleCounts,
    pub listings: ListingCounts,
    pub orders: OrderCounts,
    /// Sum of completed order totals
    pub total_revenue: Decimal,
    /// Sum of platform fees on completed orders
    pub total_platform_fee_collected: Decimal,
    pub recent_activity: Vec<ActivityEntry>,
}

//! Database Models
//!
//! Stored shapes for the three tables. Amounts are integer cents, quantities
//! integer thousandths, timestamps Unix millis; conversion to the API's
//! decimals happens in the `From` impls.

pub mod account;
pub mod listing;
pub mod order;

pub use account::{Account, NewAccount};
pub use listing::{Listing, NewListing};
pub use order::{NewOrder, PurchaseOrder};

use surrealdb::RecordId;
use uuid::Uuid;

pub const ACCOUNT_TABLE: &str = "account";
pub const LISTING_TABLE: &str = "listing";
pub const ORDER_TABLE: &str = "purchase_order";

// =============================================================================
// ID Convention: "table:key" everywhere
// =============================================================================
//
// Keys are generated before the write so a transaction can reference the
// record it is about to create:
//   account:a<uuid>   listing:l<uuid>   purchase_order:o<uuid>

/// Fresh record id for `table`, key prefixed with `prefix`
pub fn new_record_id(table: &str, prefix: char) -> RecordId {
    RecordId::from_table_key(table, format!("{}{}", prefix, Uuid::new_v4().simple()))
}

/// Accept a full `table:key` id or a bare key; reject ids of another table
pub fn parse_record_id(table: &str, raw: &str) -> Option<RecordId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let id = if raw.contains(':') {
        raw.parse::<RecordId>().ok()?
    } else {
        RecordId::from_table_key(table, raw)
    };
    (id.table() == table).then_some(id)
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_table_and_prefix() {
        let id = new_record_id(LISTING_TABLE, 'l');
        assert_eq!(id.table(), "listing");
        assert!(id.key().to_string().starts_with('l'));
        assert_ne!(id, new_record_id(LISTING_TABLE, 'l'));
    }

    #[test]
    fn parse_accepts_full_and_bare_ids() {
        let full = parse_record_id(LISTING_TABLE, "listing:labc").unwrap();
        let bare = parse_record_id(LISTING_TABLE, "labc").unwrap();
        assert_eq!(full, bare);
        assert_eq!(full.to_string(), "listing:labc");
    }

    #[test]
    fn parse_rejects_foreign_table() {
        assert!(parse_record_id(LISTING_TABLE, "account:a1").is_none());
        assert!(parse_record_id(LISTING_TABLE, "").is_none());
    }
}

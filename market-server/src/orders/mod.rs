//! Inventory-aware order placement
//!
//! ```text
//! place(buyer, listing, qty)
//!   └─ per-listing lock
//!        └─ read listing ─ checks ─ price
//!             └─ BEGIN; claim stock IF enough AND same price; CREATE order; COMMIT
//!                  ├─ committed ─────────────► Order
//!                  ├─ claim matched nothing ─► re-read, re-check, retry
//!                  └─ storage conflict ──────► back off, retry
//! ```

pub mod locks;
pub mod placement;

pub use locks::{ListingGuard, ListingLocks};
pub use placement::OrderService;

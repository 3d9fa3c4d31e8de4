//! Data models
//!
//! API request/response types shared between the server and its clients.
//! IDs are SurrealDB record ids rendered as `table:key` strings, money and
//! quantities are `Decimal`, timestamps are Unix millis.

pub mod account;
pub mod listing;
pub mod order;
pub mod report;

// Re-exports
pub use account::*;
pub use listing::*;
pub use order::*;
pub use report::*;

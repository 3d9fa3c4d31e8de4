//! Service layer
//!
//! - [`AccountService`] - registration, login, account administration
//! - [`ListingService`] - listing creation, moderation, marketplace views
//! - [`QualityAnalyzer`] - image scoring seam used at listing creation
//!
//! Order placement lives in [`crate::orders`], reporting in
//! [`crate::reporting`].

pub mod accounts;
pub mod listings;
pub mod quality;

pub use accounts::AccountService;
pub use listings::ListingService;
pub use quality::{PlaceholderAnalyzer, QualityAnalyzer};

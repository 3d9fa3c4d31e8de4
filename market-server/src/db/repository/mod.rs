//! Repository Module
//!
//! Table access for accounts, listings, orders and reports. Repositories hold
//! a cloned handle and speak SurrealQL; they know nothing about roles.

pub mod account;
pub mod listing;
pub mod order;
pub mod report;

pub use account::AccountRepository;
pub use listing::ListingRepository;
pub use order::{OrderRepository, PlacementError};
pub use report::ReportRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        // Unique index violation
        if message.contains("already contains") {
            RepoError::Duplicate(message)
        } else {
            RepoError::Database(message)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// SurrealDB caveat: WHERE + ORDER BY + LIMIT may drop the first row on the
// embedded engine. Filtered queries return the full set and truncate in Rust;
// LIMIT only appears on unfiltered scans.
// =============================================================================

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

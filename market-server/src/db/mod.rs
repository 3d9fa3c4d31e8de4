//! Database Module
//!
//! Owns the embedded SurrealDB handle: open with retry/backoff, schema,
//! health check and shutdown.

pub mod models;
pub mod repository;
mod schema;

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::core::{MarketError, MarketResult};

const NAMESPACE: &str = "market";
const DATABASE: &str = "market";

/// Database service, cloned into every repository
#[derive(Clone)]
pub struct DbService {
    db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk store at `path`, retrying with linear backoff
    ///
    /// RocksDB refuses a second opener of the same directory; a previous
    /// process that is still shutting down shows up as a transient failure.
    pub async fn open(path: &Path, attempts: u32, backoff: Duration) -> MarketResult<Self> {
        let attempts = attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match Surreal::new::<RocksDb>(path).await {
                Ok(db) => {
                    tracing::info!(path = %path.display(), attempt, "Database opened");
                    return Self::prepare(db).await;
                }
                Err(e) => {
                    last_error = e.to_string();
                    tracing::warn!(
                        path = %path.display(),
                        attempt,
                        attempts,
                        error = %e,
                        "Failed to open database"
                    );
                    if attempt < attempts {
                        tokio::time::sleep(backoff * attempt).await;
                    }
                }
            }
        }

        Err(MarketError::ServiceUnavailable(format!(
            "Database unavailable after {} attempts: {}",
            attempts, last_error
        )))
    }

    /// Volatile in-memory store (tests, demos)
    pub async fn in_memory() -> MarketResult<Self> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| {
                MarketError::Internal(format!("Failed to start in-memory database: {}", e))
            })?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> MarketResult<Self> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| MarketError::Internal(format!("Failed to select namespace: {}", e)))?;

        db.query(schema::SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| MarketError::Internal(format!("Failed to apply schema: {}", e)))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }

    pub fn handle(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub async fn health_check(&self) -> MarketResult<()> {
        self.db
            .health()
            .await
            .map_err(|e| {
                MarketError::ServiceUnavailable(format!("Database health check failed: {}", e))
            })
    }

    /// Release the handle; the engine flushes when the last clone drops
    pub async fn shutdown(self) {
        if let Err(e) = self.db.invalidate().await {
            tracing::debug!(error = %e, "Database invalidate on shutdown failed");
        }
        drop(self.db);
        tracing::info!("Database handle released");
    }
}

/// Run a store call under `limit`; expiry surfaces as ServiceUnavailable
pub async fn bounded<T, E, F>(limit: Duration, fut: F) -> MarketResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<MarketError>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Store call timed out");
            Err(MarketError::ServiceUnavailable("store call timed out".to_string()))
        }
    }
}

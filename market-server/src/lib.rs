//! Farm marketplace server
//!
//! Producers list produce, administrators moderate it, buyers order it.
//! Everything persists in an embedded SurrealDB.
//!
//! ```text
//! market-server/src/
//! ├── core/        config, state, server, MarketError
//! ├── auth/        JWT, passwords, policy table, middleware
//! ├── pricing/     payout and platform fee arithmetic
//! ├── db/          store handle, schema, records, repositories
//! ├── services/    accounts, listings, quality scoring
//! ├── orders/      inventory-aware placement and cancellation
//! ├── reporting/   administrator summary
//! ├── api/         HTTP routes and handlers
//! ├── middleware/  request logging
//! └── utils/       logger
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod orders;
pub mod pricing;
pub mod reporting;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, MarketError, MarketResult, Server, ServerState};
pub use pricing::FeePolicy;
pub use shared::{ApiResponse, AppError, ErrorCode};
pub use utils::{cleanup_old_logs, init_logger};

/// Security event, written to the `security` log target
///
/// ```ignore
/// security_log!("WARN", "login_failed", email = email.as_str(), reason = "unknown_email");
/// security_log!("INFO", "role_changed", actor = user.id.as_str(), role = role.as_str());
/// ```
#[macro_export]
macro_rules! security_log {
    ("WARN", $event:expr, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = $event,
            level = "WARN",
            $($arg)*
        )
    };
    ("ERROR", $event:expr, $($arg:tt)*) => {
        tracing::error!(
            target: "security",
            event = $event,
            level = "ERROR",
            $($arg)*
        )
    };
    ("INFO", $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            event = $event,
            level = "INFO",
            $($arg)*
        )
    };
}

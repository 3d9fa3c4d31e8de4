//! Administrator Routes
//!
//! Every route here is gated by [`require_operation`] and the services check
//! again before touching the store.
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /api/admin/summary | GET | reports:view |
//! | /api/admin/listings/pending | GET | listings:pending |
//! | /api/admin/listings/{id}/moderate | POST | listings:moderate |
//! | /api/admin/accounts | GET | accounts:manage |
//! | /api/admin/accounts/{id}/role | PUT | accounts:manage |
//! | /api/admin/accounts/{id} | DELETE | accounts:manage |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::{Operation, require_operation};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let reports = Router::new()
        .route("/api/admin/summary", get(handler::summary))
        .layer(middleware::from_fn(require_operation(Operation::ViewReports)));

    let queue = Router::new()
        .route("/api/admin/listings/pending", get(handler::pending_listings))
        .layer(middleware::from_fn(require_operation(
            Operation::ViewPendingListings,
        )));

    let moderation = Router::new()
        .route(
            "/api/admin/listings/{id}/moderate",
            post(handler::moderate_listing),
        )
        .layer(middleware::from_fn(require_operation(
            Operation::ModerateListing,
        )));

    let accounts = Router::new()
        .route("/api/admin/accounts", get(handler::list_accounts))
        .route("/api/admin/accounts/{id}/role", put(handler::change_role))
        .route("/api/admin/accounts/{id}", delete(handler::delete_account))
        .layer(middleware::from_fn(require_operation(
            Operation::ManageAccounts,
        )));

    Router::new()
        .merge(reports)
        .merge(queue)
        .merge(moderation)
        .merge(accounts)
}

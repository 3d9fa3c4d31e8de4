//! Listing Routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/listings | GET | none |
//! | /api/listings | POST | producer |
//! | /api/listings/mine | GET | producer |
//! | /api/listings/{id} | GET | none (unapproved: owner or admin) |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{Operation, require_operation};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let producer = Router::new()
        .route("/api/listings/mine", get(handler::mine))
        .layer(middleware::from_fn(require_operation(
            Operation::ViewOwnListings,
        )));

    Router::new()
        .route(
            "/api/listings",
            get(handler::marketplace).post(handler::create),
        )
        .route("/api/listings/{id}", get(handler::get_by_id))
        .merge(producer)
}

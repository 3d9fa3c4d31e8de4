//! Order Routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/orders | POST | buyer |
//! | /api/orders/mine | GET | buyer |
//! | /api/orders/received | GET | producer |
//! | /api/orders/{id}/cancel | POST | ordering buyer or admin |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::{Operation, require_operation};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let placement = Router::new()
        .route("/api/orders", post(handler::place))
        .layer(middleware::from_fn(require_operation(Operation::PlaceOrder)));

    let history = Router::new()
        .route("/api/orders/mine", get(handler::mine))
        .layer(middleware::from_fn(require_operation(Operation::ViewOwnOrders)));

    let producer = Router::new()
        .route("/api/orders/received", get(handler::received))
        .layer(middleware::from_fn(require_operation(
            Operation::ViewReceivedOrders,
        )));

    // Ownership is checked against the stored order, not here
    let cancel = Router::new()
        .route("/api/orders/{id}/cancel", post(handler::cancel))
        .layer(middleware::from_fn(require_operation(Operation::CancelOrder)));

    Router::new()
        .merge(placement)
        .merge(history)
        .merge(producer)
        .merge(cancel)
}

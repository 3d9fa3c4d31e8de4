//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - store health check
//! - [`auth`] - registration, login, current account
//! - [`pricing`] - fee preview for the listing form
//! - [`listings`] - marketplace and producer listings
//! - [`orders`] - placement, history, cancellation
//! - [`admin`] - moderation, accounts, summary
//! - [`upload`] - listing images

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::middleware;

pub mod admin;
pub mod auth;
pub mod health;
pub mod listings;
pub mod orders;
pub mod pricing;
pub mod upload;

pub mod router_ext;
pub use router_ext::{OneshotResult, OneshotRouter};

/// Slack on top of the upload limit for multipart framing
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no middleware, no state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(pricing::router())
        .merge(listings::router())
        .merge(orders::router())
        .merge(admin::router())
        .merge(upload::router())
}

/// Routes plus the middleware stack; used by the server and by oneshot calls
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_bytes + MULTIPART_OVERHEAD,
        ))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // Outermost: authenticates first so inner layers see CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}

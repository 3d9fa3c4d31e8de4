//! Authentication middleware
//!
//! Authenticates every `/api/` request that is not public and injects the
//! [`CurrentUser`] into request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;
use shared::AppError;

use crate::auth::extractor::authenticate;
use crate::auth::permissions::{Operation, authorize};
use crate::auth::CurrentUser;
use crate::core::ServerState;

/// Routes reachable without a token
fn is_public_route(method: &Method, path: &str) -> bool {
    match *method {
        Method::POST => matches!(
            path,
            "/api/auth/login" | "/api/auth/register" | "/api/pricing/quote"
        ),
        Method::GET => {
            path == "/api/listings"
                || (path.starts_with("/api/listings/") && path != "/api/listings/mine")
        }
        _ => false,
    }
}

/// Require a valid token on every non-public API route
///
/// A token presented on a public route is still validated, so a bad token is
/// never silently ignored.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS || !req.uri().path().starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    if auth_header.is_none() && is_public_route(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let user = authenticate(&state.jwt_service, auth_header.as_deref(), req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Guard a router with one policy-table operation
///
/// ```ignore
/// Router::new()
///     .route("/api/admin/summary", get(handler::summary))
///     .layer(middleware::from_fn(require_operation(Operation::ViewReports)));
/// ```
pub fn require_operation(
    op: Operation,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::not_authenticated)?;
            authorize(user, op)?;
            Ok(next.run(req).await)
        })
    }
}

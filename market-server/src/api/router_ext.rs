//! In-process calls into the router
//!
//! Lets tests and embedded callers drive the full middleware stack without a
//! socket.

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use http::{Request, Response};
use tower::Service;

use crate::core::ServerState;

pub type OneshotResult = Result<Response<Body>>;

#[async_trait::async_trait]
pub trait OneshotRouter {
    /// Run one request through the router with `state` applied
    ///
    /// ```ignore
    /// let mut app = api::build_app(&state);
    /// let response = app
    ///     .oneshot(&state, Request::get("/health").body(Body::empty())?)
    ///     .await?;
    /// ```
    async fn oneshot(&mut self, state: &ServerState, request: Request<Body>) -> OneshotResult;
}

#[async_trait::async_trait]
impl OneshotRouter for Router<ServerState> {
    async fn oneshot(&mut self, state: &ServerState, request: Request<Body>) -> OneshotResult {
        let mut svc = self.clone().with_state(state.clone());
        Ok(svc.call(request).await?)
    }
}

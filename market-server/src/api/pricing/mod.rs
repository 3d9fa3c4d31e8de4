//! Fee preview
//!
//! `POST /api/pricing/quote` is public so the listing form can show the
//! payout before the producer signs in.

use axum::{Json, Router, extract::State, routing::post};
use shared::models::{PricingQuote, PricingQuoteRequest};
use shared::{ApiResponse, AppError};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/pricing/quote", post(quote))
}

async fn quote(
    State(state): State<ServerState>,
    Json(req): Json<PricingQuoteRequest>,
) -> Result<Json<ApiResponse<PricingQuote>>, AppError> {
    let quote = state.listings.quote(&req)?;
    Ok(Json(ApiResponse::success(quote)))
}

//! Listing Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{ListingCreate, ListingCreated, ListingResponse};
use shared::{ApiResponse, AppError};

use crate::auth::{CurrentUser, MaybeUser};
use crate::core::ServerState;

/// Approved, in-stock listings
pub async fn marketplace(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<ListingResponse>>>, AppError> {
    let listings = state.listings.marketplace().await?;
    Ok(Json(ApiResponse::success(listings)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ListingResponse>>, AppError> {
    let listing = state.listings.get(viewer.as_ref(), &id).await?;
    Ok(Json(ApiResponse::success(listing)))
}

/// Create a listing; the service enforces the producer role
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ListingCreate>,
) -> Result<Json<ApiResponse<ListingCreated>>, AppError> {
    let created = state.listings.create(&user, req).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Listing created",
        created,
    )))
}

pub async fn mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<ListingResponse>>>, AppError> {
    let listings = state.listings.mine(&user).await?;
    Ok(Json(ApiResponse::success(listings)))
}

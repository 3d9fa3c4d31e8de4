//! Administrator Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{
    AccountResponse, AdminSummary, ListingResponse, ModerationRequest, RoleChangeRequest,
};
use shared::{ApiResponse, AppError};

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// Counts, revenue and recent activity
pub async fn summary(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<AdminSummary>>, AppError> {
    let summary = state.reporting.summary(&user).await?;
    Ok(Json(ApiResponse::success(summary)))
}

pub async fn pending_listings(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<ListingResponse>>>, AppError> {
    let listings = state.listings.pending(&user).await?;
    Ok(Json(ApiResponse::success(listings)))
}

/// Approve or refuse a listing
pub async fn moderate_listing(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ModerationRequest>,
) -> Result<Json<ApiResponse<ListingResponse>>, AppError> {
    let listing = state.listings.moderate(&user, &id, req.status).await?;
    Ok(Json(ApiResponse::success(listing)))
}

pub async fn list_accounts(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, AppError> {
    let accounts = state.accounts.list(&user).await?;
    Ok(Json(ApiResponse::success(accounts)))
}

/// Takes effect at the account's next login
pub async fn change_role(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<RoleChangeRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, AppError> {
    let account = state.accounts.change_role(&user, &id, req.role).await?;
    Ok(Json(ApiResponse::success(account)))
}

/// Removes the account with its listings and every order touching them
pub async fn delete_account(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.accounts.delete(&user, &id).await?;
    Ok(Json(ApiResponse::ok()))
}

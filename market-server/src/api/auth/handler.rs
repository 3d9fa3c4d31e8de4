//! Account Handlers

use axum::{Json, extract::State};
use shared::models::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest};
use shared::{ApiResponse, AppError};

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// Self-service registration as producer or buyer
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, AppError> {
    let account = state.accounts.register(req).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Account created",
        account,
    )))
}

/// Exchange credentials for a token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = state.accounts.login(req).await?;
    Ok(Json(ApiResponse::success(response)))
}

pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<AccountResponse>>, AppError> {
    let account = state.accounts.me(&user).await?;
    Ok(Json(ApiResponse::success(account)))
}

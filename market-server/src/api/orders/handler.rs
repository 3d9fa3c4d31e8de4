//! Order Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{OrderCreate, OrderResponse};
use shared::{ApiResponse, AppError};

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// Place an order; all or nothing
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<OrderCreate>,
) -> Result<Json<ApiResponse<OrderResponse>>, AppError> {
    let order = state.orders.place(&user, req).await?;
    Ok(Json(ApiResponse::success_with_message("Order placed", order)))
}

pub async fn mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<OrderResponse>>>, AppError> {
    let orders = state.orders.mine(&user).await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn received(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<OrderResponse>>>, AppError> {
    let orders = state.orders.received(&user).await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OrderResponse>>, AppError> {
    let order = state.orders.cancel(&user, &id).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Order cancelled",
        order,
    )))
}

//! Checkout API handler

use axum::{Json, Router, extract::State, routing::post};

use shared::order::{CheckoutRequest, Order};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/checkout", post(checkout))
}

/// Create one order per vendor from the customer's cart
async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state
        .engine
        .checkout(payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(orders))
}

//! Cart API handlers
//!
//! Thin data access over cart lines; the checkout transaction reads the
//! same rows server-side.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use shared::models::CartLine;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/cart/{customer_id}", get(list).delete(clear))
        .route("/api/cart/{customer_id}/items", post(add_line))
}

#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    pub product_id: u64,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddLineResponse {
    pub line_id: u64,
}

/// Append a line to a customer's cart
async fn add_line(
    State(state): State<ServerState>,
    Path(customer_id): Path<u64>,
    Json(payload): Json<AddLineRequest>,
) -> AppResult<Json<AddLineResponse>> {
    if payload.quantity == 0 {
        return Err(AppError::validation("quantity must be positive"));
    }
    if state
        .store
        .get_product(payload.product_id)
        .map_err(AppError::from)?
        .is_none()
    {
        return Err(AppError::not_found(format!(
            "Product {} not found",
            payload.product_id
        )));
    }

    let line = CartLine {
        product_id: payload.product_id,
        quantity: payload.quantity,
        size: payload.size,
        color: payload.color,
    };
    let line_id = state
        .store
        .add_cart_line(customer_id, &line)
        .map_err(AppError::from)?;
    Ok(Json(AddLineResponse { line_id }))
}

/// List a customer's cart lines
async fn list(
    State(state): State<ServerState>,
    Path(customer_id): Path<u64>,
) -> AppResult<Json<Vec<CartLine>>> {
    let lines = state
        .store
        .cart_lines(customer_id)
        .map_err(AppError::from)?;
    Ok(Json(lines))
}

/// Drop the whole cart
async fn clear(
    State(state): State<ServerState>,
    Path(customer_id): Path<u64>,
) -> AppResult<Json<()>> {
    state.store.clear_cart(customer_id).map_err(AppError::from)?;
    Ok(Json(()))
}

//! Order API handlers

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;

use shared::order::{Order, OrderDetail, StatusUpdateRequest};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(list))
        .route("/api/orders/{id}", get(get_by_id))
        .route("/api/orders/{id}/status", put(update_status))
}

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub customer_id: u64,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

/// List a customer's orders (paginated, newest first)
async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state
        .engine
        .list_orders(query.customer_id, query.limit, query.offset)
        .map_err(AppError::from)?;
    Ok(Json(orders))
}

/// Get one order with its line items
async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = state.engine.get_order(id).map_err(AppError::from)?;
    Ok(Json(detail))
}

/// Advance an order through its status lifecycle
async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .engine
        .update_status(id, payload.status, payload.user_id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(order))
}

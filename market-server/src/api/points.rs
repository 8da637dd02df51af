//! Loyalty points API handlers

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;

use shared::models::points::{PointsSummary, UserPoints};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/users/{user_id}/points", get(get_points))
        .route("/api/users/{user_id}/points/spend", post(spend))
}

/// Balance plus history for one user
async fn get_points(
    State(state): State<ServerState>,
    Path(user_id): Path<u64>,
) -> AppResult<Json<PointsSummary>> {
    let summary = state.engine.get_points(user_id).map_err(AppError::from)?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
pub struct SpendRequest {
    pub amount: i64,
    pub description: String,
}

/// Spend points; fails when the balance is insufficient
async fn spend(
    State(state): State<ServerState>,
    Path(user_id): Path<u64>,
    Json(payload): Json<SpendRequest>,
) -> AppResult<Json<UserPoints>> {
    if payload.amount <= 0 {
        return Err(AppError::validation("amount must be positive"));
    }
    let points = state
        .engine
        .spend_points(user_id, payload.amount, &payload.description)
        .map_err(AppError::from)?;
    Ok(Json(points))
}

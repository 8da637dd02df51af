//! Notification API handlers

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use shared::models::Notification;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/users/{user_id}/notifications", get(list))
}

/// A user's notifications, newest first
async fn list(
    State(state): State<ServerState>,
    Path(user_id): Path<u64>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state
        .store
        .notifications_for_user(user_id)
        .map_err(AppError::from)?;
    Ok(Json(notifications))
}

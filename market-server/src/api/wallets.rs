//! Vendor wallet API handlers

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use shared::models::wallet::WalletSummary;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/vendors/{vendor_id}/wallet", get(get_wallet))
}

/// Balances plus the transaction log for one vendor
async fn get_wallet(
    State(state): State<ServerState>,
    Path(vendor_id): Path<u64>,
) -> AppResult<Json<WalletSummary>> {
    let summary = state
        .engine
        .get_wallet(vendor_id)
        .map_err(AppError::from)?;
    Ok(Json(summary))
}

//! Loyalty Points Model

use serde::{Deserialize, Serialize};

/// Kind of a points ledger entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PointsKind {
    Earn,
    Spend,
    Refund,
}

/// Per-customer loyalty point balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPoints {
    pub user_id: u64,
    pub points: i64,
    /// Epoch milliseconds
    pub updated_at: i64,
}

impl UserPoints {
    pub fn empty(user_id: u64, now: i64) -> Self {
        Self {
            user_id,
            points: 0,
            updated_at: now,
        }
    }
}

/// Append-only points audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsTransaction {
    pub user_id: u64,
    /// Signed amount: positive for earn/refund, negative for spend
    pub amount: i64,
    pub kind: PointsKind,
    pub description: String,
    /// Epoch milliseconds
    pub created_at: i64,
}

/// Points balance plus history, as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsSummary {
    pub user_id: u64,
    pub points: i64,
    pub transactions: Vec<PointsTransaction>,
}

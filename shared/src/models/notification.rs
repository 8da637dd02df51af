//! Notification Model

use serde::{Deserialize, Serialize};

/// User-facing event, delivered best-effort
///
/// Delivery failures never fail the operation that produced the
/// notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: u64,
    /// Event kind, e.g. `new_order`, `order_status`, `order_delivered`
    pub kind: String,
    pub title: String,
    pub message: String,
    /// Related entity id (usually an order)
    pub related_id: Option<u64>,
    pub is_read: bool,
    /// Epoch milliseconds
    pub created_at: i64,
}

//! Vendor Wallet Model

use serde::{Deserialize, Serialize};

/// Direction of a wallet transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Credit,
    Debit,
}

/// Settlement state of a wallet transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TxnStatus {
    Pending,
    Completed,
    Failed,
}

/// Per-vendor balance with two buckets
///
/// `pending_balance` holds funds credited on payment (reversible until
/// delivery); `available_balance` holds funds released after the customer
/// confirms receipt. Both are always >= 0 and must reconcile against the
/// transaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorWallet {
    pub vendor_id: u64,
    pub available_balance: f64,
    pub pending_balance: f64,
    /// Epoch milliseconds
    pub updated_at: i64,
}

impl VendorWallet {
    /// Zero-initialized wallet for a vendor
    pub fn empty(vendor_id: u64, now: i64) -> Self {
        Self {
            vendor_id,
            available_balance: 0.0,
            pending_balance: 0.0,
            updated_at: now,
        }
    }
}

/// Append-only wallet audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub vendor_id: u64,
    /// Amount in currency units (always positive; direction is `kind`)
    pub amount: f64,
    pub kind: TxnKind,
    pub status: TxnStatus,
    /// Originating order
    pub order_id: u64,
    pub description: String,
    /// Epoch milliseconds
    pub created_at: i64,
}

/// Wallet plus its transaction log, as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSummary {
    pub vendor_id: u64,
    pub available_balance: f64,
    pub pending_balance: f64,
    pub transactions: Vec<WalletTransaction>,
}

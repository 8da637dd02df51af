//! Market Server - multi-vendor marketplace fulfillment and settlement
//!
//! # Architecture Overview
//!
//! The core of this server is the order fulfillment engine: it turns a
//! shared cart into one order per vendor, applies discounts, validates
//! and decrements stock, computes platform commission, drives each order
//! through its status lifecycle and moves money between the platform and
//! per-vendor wallets.
//!
//! # Module Structure
//!
//! ```text
//! market-server/src/
//! ├── core/          # Configuration, state, server bootstrap
//! ├── storage/       # Embedded redb storage (single-writer atomicity)
//! ├── orders/        # Fulfillment engine, status machine, money
//! ├── discounts/     # Pure offer/coupon resolution
//! ├── wallet/        # Vendor wallet ledger (pending/available)
//! ├── points/        # Loyalty points ledger
//! ├── notify/        # Best-effort notification delivery
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logging, error re-exports
//! ```

pub mod api;
pub mod core;
pub mod discounts;
pub mod notify;
pub mod orders;
pub mod points;
pub mod storage;
pub mod utils;
pub mod wallet;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use notify::{Notifier, StoreNotifier};
pub use orders::{FulfillmentEngine, OrderError};
pub use points::PointsLedger;
pub use storage::MarketStore;
pub use utils::{AppError, AppResult};
pub use wallet::WalletLedger;

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    __  ___           __        __
   /  |/  /___ ______/ /_____  / /_
  / /|_/ / __ `/ ___/ //_/ _ \/ __/
 / /  / / /_/ / /  / ,< /  __/ /_
/_/  /_/\__,_/_/  /_/|_|\___/\__/
    "#
    );
}

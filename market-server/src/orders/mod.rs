//! Order fulfillment module
//!
//! This module implements the order engine:
//!
//! - **engine**: checkout orchestration and status transitions
//! - **checkout**: pure planning pipeline (grouping, stock validation,
//!   pricing)
//! - **status**: forward-only status state machine
//! - **money**: decimal-precise monetary arithmetic
//! - **error**: engine error taxonomy
//!
//! # Data Flow
//!
//! 1. Client calls `checkout` or `update_status` via the HTTP API
//! 2. The engine opens one write transaction for the whole operation
//! 3. Pure planning functions compute groups, discounts and totals
//! 4. Orders, items, stock, usage counters, wallet and points are
//!    persisted together, then the transaction commits
//! 5. Notifications fan out after commit, best-effort

pub mod checkout;
pub mod engine;
pub mod error;
pub mod money;
pub mod status;

pub use engine::FulfillmentEngine;
pub use error::{OrderError, OrderResult};

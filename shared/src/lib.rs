//! Shared types for the marketplace platform
//!
//! This crate holds everything both the server and its clients agree on:
//!
//! - **models** (`models`): catalog, cart, coupon/offer, wallet, points
//!   and notification entities
//! - **order** (`order`): order records, the status lifecycle and the
//!   checkout request/response types
//! - **error** (`error`): unified application error and API response
//!   envelope
//!
//! No storage or HTTP handler logic lives here.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-export common types
pub use error::{AppError, AppResponse, AppResult};
pub use order::{Order, OrderDetail, OrderItem, OrderStatus, PaymentMethod, PaymentStatus};

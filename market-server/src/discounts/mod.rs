//! Discount resolution
//!
//! Pure evaluation of a vendor's automatic offers and an optional
//! vendor-scoped coupon against one vendor group's line items. The
//! fulfillment engine applies the outcome (and increments usage
//! counters) inside its checkout transaction.

pub mod resolver;

pub use resolver::{DiscountOutcome, resolve};

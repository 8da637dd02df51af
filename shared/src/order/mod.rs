//! Order types
//!
//! The order record, its immutable line items, the status lifecycle and
//! the request payloads accepted at the fulfillment boundary.

pub mod types;

pub use types::{
    CheckoutRequest, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress,
    StatusUpdateRequest,
};

use serde::{Deserialize, Serialize};

/// Order entity
///
/// One order per (checkout, vendor) pair: a single checkout spanning
/// three vendors creates three orders inside the same transaction.
///
/// Invariant: `total == subtotal - discount + shipping_cost`.
/// `commission` is informational; it is subtracted only when computing
/// the vendor wallet credit, never from the customer-facing total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    /// Unique, human-readable, collision-resistant under concurrency
    pub order_number: String,
    pub customer_id: u64,
    pub vendor_id: u64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    /// Sum of unit price x quantity across line items
    pub subtotal: f64,
    /// Automatic offers + coupon, combined
    pub discount: f64,
    pub shipping_cost: f64,
    /// Platform cut of the net sale (informational)
    pub commission: f64,
    pub total: f64,
    /// Set once loyalty points have been awarded for this order, so the
    /// cash-on-delivery path cannot award twice
    pub points_awarded: bool,
    pub shipping_address: ShippingAddress,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds
    pub updated_at: i64,
}

/// Immutable snapshot of a purchased line at checkout time
///
/// Later price changes on the product must not retroactively alter
/// historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_id: u64,
    pub product_id: u64,
    pub vendor_id: u64,
    pub quantity: u32,
    /// Unit price at purchase time
    pub price: f64,
    /// price x quantity
    pub total: f64,
    pub size: Option<String>,
}

/// Order plus its line items, as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

//! Cart Model

use serde::{Deserialize, Serialize};

/// A single line in a customer's cart
///
/// Ephemeral; the whole cart is deleted once an order has been created
/// from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: u64,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<String>,
}

//! Product Model

use serde::{Deserialize, Serialize};

/// Per-size stock bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SizeStock {
    pub size: String,
    pub quantity: u32,
}

/// Product listing
///
/// Stock is the single source of truth for availability. The fulfillment
/// engine is the only writer that decrements it, at checkout time, inside
/// the checkout transaction. `sizes` is empty for products sold without a
/// size dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub vendor_id: u64,
    pub name_ar: String,
    pub name_en: String,
    /// Unit price in currency units
    pub price: f64,
    /// Flat stock counter
    pub stock: u32,
    /// Per-size counters (empty when the product is not sized)
    #[serde(default)]
    pub sizes: Vec<SizeStock>,
    pub is_active: bool,
}

impl Product {
    /// Available quantity for an optional size selection
    pub fn available(&self, size: Option<&str>) -> u32 {
        match size {
            Some(s) => self
                .sizes
                .iter()
                .find(|b| b.size == s)
                .map(|b| b.quantity)
                .unwrap_or(0),
            None => self.stock,
        }
    }
}

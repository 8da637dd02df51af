//! Offer Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an offer applies to
///
/// Explicit sum type: a store-wide offer covers every line item of the
/// vendor, a product-list offer covers matching line items only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "product_ids")]
pub enum OfferScope {
    StoreWide,
    Products(Vec<u64>),
}

/// Automatic, date-bounded, quantity-gated vendor discount
///
/// Triggers without a code when the sum of quantities of matching line
/// items reaches `min_quantity`, `now` falls inside the date window
/// (inclusive of the whole end day) and the usage cap is not exhausted.
/// Multiple offers stack additively on the same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: u64,
    pub vendor_id: u64,
    pub name_ar: String,
    pub name_en: String,
    /// Percent of the matching subtotal (0-100)
    pub discount_percent: f64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub usage_limit: Option<u32>,
    /// Minimum total quantity of matching items for the offer to trigger
    pub min_quantity: u32,
    pub used_count: u32,
    pub scope: OfferScope,
    pub is_active: bool,
}

impl Offer {
    /// Whether the usage cap still has room
    pub fn has_uses_left(&self) -> bool {
        self.usage_limit
            .map(|limit| self.used_count < limit)
            .unwrap_or(true)
    }
}

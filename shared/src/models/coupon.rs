//! Coupon Model

use serde::{Deserialize, Serialize};

/// Code-gated discount, scoped to exactly one vendor
///
/// Applying a coupon to a multi-vendor checkout only discounts the
/// matching vendor's order. `used_count` increments once per order that
/// successfully applies it; `used_count <= max_uses` whenever `max_uses`
/// is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: u64,
    pub vendor_id: u64,
    /// Unique, case-sensitive code
    pub code: String,
    /// Percent of the vendor-group subtotal (0-100)
    pub discount_percent: f64,
    pub max_uses: Option<u32>,
    pub used_count: u32,
    pub is_active: bool,
}

impl Coupon {
    /// Whether the coupon can still be applied
    pub fn is_usable(&self) -> bool {
        self.is_active
            && self
                .max_uses
                .map(|max| self.used_count < max)
                .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_coupon(max_uses: Option<u32>, used_count: u32, is_active: bool) -> Coupon {
        Coupon {
            id: 1,
            vendor_id: 1,
            code: "SAVE10".to_string(),
            discount_percent: 10.0,
            max_uses,
            used_count,
            is_active,
        }
    }

    #[test]
    fn test_usable_without_cap() {
        assert!(make_coupon(None, 999, true).is_usable());
    }

    #[test]
    fn test_usable_under_cap() {
        assert!(make_coupon(Some(5), 4, true).is_usable());
    }

    #[test]
    fn test_exhausted_at_cap() {
        assert!(!make_coupon(Some(5), 5, true).is_usable());
    }

    #[test]
    fn test_inactive_never_usable() {
        assert!(!make_coupon(None, 0, false).is_usable());
    }
}

//! Vendor Model

use serde::{Deserialize, Serialize};

/// Vendor (independent store on the platform)
///
/// `shipping_cost` and `commission_rate` feed into every order created
/// for this vendor; the owning user (`user_id`) is the account allowed
/// to act on the vendor's orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: u64,
    /// Owning user account
    pub user_id: u64,
    pub store_name_ar: String,
    pub store_name_en: String,
    /// Flat shipping cost per order, in currency units
    pub shipping_cost: f64,
    /// Platform commission, percent of net sale (0-100)
    pub commission_rate: f64,
    pub is_active: bool,
}

//! Checkout planning pipeline
//!
//! Pure steps between the cart and the transactional commit: resolve
//! cart lines against product snapshots, group them by vendor, validate
//! stock all-or-nothing, and price each vendor group. Nothing here
//! touches storage; the engine feeds these functions data read inside
//! its write transaction and applies the results there.

use std::collections::{BTreeMap, HashMap};

use shared::models::{CartLine, Product};

use super::error::{OrderError, OrderResult};
use super::money;
use crate::discounts::DiscountOutcome;

/// A cart line resolved against its product snapshot
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product_id: u64,
    pub product_name: String,
    pub vendor_id: u64,
    pub quantity: u32,
    pub size: Option<String>,
    /// Unit price at checkout time
    pub unit_price: f64,
    /// unit_price x quantity
    pub line_total: f64,
}

/// The subset of a checkout belonging to one vendor; becomes one order
#[derive(Debug, Clone)]
pub struct VendorGroup {
    pub vendor_id: u64,
    pub lines: Vec<PricedLine>,
    pub subtotal: f64,
}

/// Priced order-to-be for one vendor group
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub vendor_id: u64,
    pub subtotal: f64,
    pub discount: f64,
    pub shipping_cost: f64,
    pub commission: f64,
    pub total: f64,
    pub applied_offer_ids: Vec<u64>,
    pub coupon_applied: bool,
}

/// Group cart lines by vendor, accumulating per-vendor subtotals
///
/// Lines whose product is absent from `products` are dropped (the caller
/// logs them); groups come out in ascending vendor-id order so checkout
/// output is deterministic.
pub fn group_by_vendor(
    lines: &[CartLine],
    products: &HashMap<u64, Product>,
) -> Vec<VendorGroup> {
    let mut groups: BTreeMap<u64, VendorGroup> = BTreeMap::new();

    for line in lines {
        let Some(product) = products.get(&line.product_id) else {
            continue;
        };
        let line_total = money::line_total(product.price, line.quantity);
        let group = groups.entry(product.vendor_id).or_insert_with(|| VendorGroup {
            vendor_id: product.vendor_id,
            lines: Vec::new(),
            subtotal: 0.0,
        });
        group.subtotal = money::add(group.subtotal, line_total);
        group.lines.push(PricedLine {
            product_id: product.id,
            product_name: product.name_en.clone(),
            vendor_id: product.vendor_id,
            quantity: line.quantity,
            size: line.size.clone(),
            unit_price: product.price,
            line_total,
        });
    }

    groups.into_values().collect()
}

/// All-or-nothing stock validation across every vendor group
///
/// Requested quantities are summed per (product, size) first, so two
/// lines of the same product cannot each pass individually while jointly
/// exceeding stock. Any shortfall fails the entire checkout, naming the
/// offending product (and size).
pub fn validate_stock(
    groups: &[VendorGroup],
    products: &HashMap<u64, Product>,
) -> OrderResult<()> {
    let mut requested: BTreeMap<(u64, Option<String>), u32> = BTreeMap::new();
    for group in groups {
        for line in &group.lines {
            *requested
                .entry((line.product_id, line.size.clone()))
                .or_insert(0) += line.quantity;
        }
    }

    for ((product_id, size), quantity) in requested {
        let Some(product) = products.get(&product_id) else {
            continue;
        };
        if product.available(size.as_deref()) < quantity {
            return Err(OrderError::InsufficientStock {
                product: product.name_en.clone(),
                size,
            });
        }
    }

    Ok(())
}

/// Decrement stock for one purchased line, clamped at zero
///
/// The flat counter always decrements; the matching size bucket
/// decrements as well when the line is sized.
pub fn apply_stock_decrement(product: &mut Product, quantity: u32, size: Option<&str>) {
    product.stock = product.stock.saturating_sub(quantity);
    if let Some(size) = size
        && let Some(bucket) = product.sizes.iter_mut().find(|b| b.size == size)
    {
        bucket.quantity = bucket.quantity.saturating_sub(quantity);
    }
}

/// Price a vendor group into an order draft
///
/// `total = subtotal - discount + shipping`; commission is taken on the
/// discounted subtotal (never negative) and never charged on shipping.
pub fn price_group(
    group: &VendorGroup,
    outcome: &DiscountOutcome,
    shipping_cost: f64,
    commission_rate: f64,
) -> OrderDraft {
    let discount = outcome.discount;
    let commission_base = money::sub_floor_zero(group.subtotal, discount);
    let commission = money::percent_of(commission_base, commission_rate);
    let total = money::order_total(group.subtotal, discount, shipping_cost);

    OrderDraft {
        vendor_id: group.vendor_id,
        subtotal: group.subtotal,
        discount,
        shipping_cost,
        commission,
        total,
        applied_offer_ids: outcome.applied_offer_ids.clone(),
        coupon_applied: outcome.coupon_applied,
    }
}

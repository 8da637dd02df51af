//! Offer and coupon evaluation
//!
//! Pure functions of `(line items, offers, coupon, now)`: same inputs,
//! same output, no storage access. The returned offer/coupon ids are the
//! ones whose usage counters the caller must increment.

use chrono::{DateTime, TimeZone, Utc};
use shared::models::{Coupon, Offer, OfferScope};

use crate::orders::checkout::PricedLine;
use crate::orders::money;

/// Result of evaluating discounts for one vendor group
#[derive(Debug, Clone, Default)]
pub struct DiscountOutcome {
    /// Total discount amount (offers + coupon, additive)
    pub discount: f64,
    /// Offers that actually triggered, once per order
    pub applied_offer_ids: Vec<u64>,
    /// Whether the supplied coupon applied to this group
    pub coupon_applied: bool,
}

/// Evaluate a vendor's offers and an optional coupon against its lines
///
/// The coupon must already be scoped to this vendor by the caller; an
/// exhausted or inactive coupon simply does not apply (checkout proceeds
/// without it).
pub fn resolve(
    lines: &[PricedLine],
    offers: &[Offer],
    coupon: Option<&Coupon>,
    now: DateTime<Utc>,
) -> DiscountOutcome {
    let mut outcome = DiscountOutcome::default();

    for offer in offers {
        if let Some(amount) = offer_discount(offer, lines, now) {
            outcome.discount = money::add(outcome.discount, amount);
            outcome.applied_offer_ids.push(offer.id);
        }
    }

    if let Some(coupon) = coupon
        && coupon.is_usable()
    {
        let subtotal = lines
            .iter()
            .fold(0.0, |acc, line| money::add(acc, line.line_total));
        outcome.discount = money::add(
            outcome.discount,
            money::percent_of(subtotal, coupon.discount_percent),
        );
        outcome.coupon_applied = true;
    }

    outcome
}

/// Discount contributed by a single offer, if it triggers
fn offer_discount(offer: &Offer, lines: &[PricedLine], now: DateTime<Utc>) -> Option<f64> {
    if !offer.is_active || !offer.has_uses_left() || !is_date_valid(offer, now) {
        return None;
    }

    let matching: Vec<&PricedLine> = lines
        .iter()
        .filter(|line| matches_scope(&offer.scope, line.product_id))
        .collect();
    if matching.is_empty() {
        return None;
    }

    let total_quantity: u32 = matching.iter().map(|line| line.quantity).sum();
    if total_quantity < offer.min_quantity {
        return None;
    }

    let matching_subtotal = matching
        .iter()
        .fold(0.0, |acc, line| money::add(acc, line.line_total));
    Some(money::percent_of(matching_subtotal, offer.discount_percent))
}

/// Whether `now` falls within the offer's window, inclusive of the whole
/// end day
fn is_date_valid(offer: &Offer, now: DateTime<Utc>) -> bool {
    let end = end_of_day(offer.ends_at);
    offer.starts_at <= now && now <= end
}

fn end_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .map(|t| Utc.from_utc_datetime(&t))
        .unwrap_or(instant)
}

/// Whether an offer scope covers a product
fn matches_scope(scope: &OfferScope, product_id: u64) -> bool {
    match scope {
        OfferScope::StoreWide => true,
        OfferScope::Products(ids) => ids.contains(&product_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_line(product_id: u64, quantity: u32, unit_price: f64) -> PricedLine {
        PricedLine {
            product_id,
            product_name: format!("Product {}", product_id),
            vendor_id: 1,
            quantity,
            size: None,
            unit_price,
            line_total: money::line_total(unit_price, quantity),
        }
    }

    fn make_offer(discount_percent: f64, min_quantity: u32, scope: OfferScope) -> Offer {
        let now = Utc::now();
        Offer {
            id: 1,
            vendor_id: 1,
            name_ar: "عرض".to_string(),
            name_en: "Offer".to_string(),
            discount_percent,
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
            usage_limit: None,
            min_quantity,
            used_count: 0,
            scope,
            is_active: true,
        }
    }

    fn make_coupon(discount_percent: f64) -> Coupon {
        Coupon {
            id: 9,
            vendor_id: 1,
            code: "SAVE".to_string(),
            discount_percent,
            max_uses: None,
            used_count: 0,
            is_active: true,
        }
    }

    #[test]
    fn test_store_wide_offer_discounts_whole_group() {
        let lines = vec![make_line(1, 2, 100.0)];
        let offer = make_offer(10.0, 2, OfferScope::StoreWide);

        let outcome = resolve(&lines, &[offer], None, Utc::now());

        assert_eq!(outcome.discount, 20.0);
        assert_eq!(outcome.applied_offer_ids, vec![1]);
        assert!(!outcome.coupon_applied);
    }

    #[test]
    fn test_product_list_offer_only_counts_matching_lines() {
        let lines = vec![make_line(1, 2, 100.0), make_line(2, 3, 50.0)];
        let mut offer = make_offer(10.0, 2, OfferScope::Products(vec![1]));
        offer.id = 7;

        let outcome = resolve(&lines, &[offer], None, Utc::now());

        // Only product 1's subtotal (200) is discounted
        assert_eq!(outcome.discount, 20.0);
        assert_eq!(outcome.applied_offer_ids, vec![7]);
    }

    #[test]
    fn test_min_quantity_gates_on_matching_items_only() {
        // Product 2 contributes 3 units, but the offer only matches product 1
        let lines = vec![make_line(1, 1, 100.0), make_line(2, 3, 50.0)];
        let offer = make_offer(10.0, 2, OfferScope::Products(vec![1]));

        let outcome = resolve(&lines, &[offer], None, Utc::now());

        assert_eq!(outcome.discount, 0.0);
        assert!(outcome.applied_offer_ids.is_empty());
    }

    #[test]
    fn test_min_quantity_sums_across_matching_lines() {
        let lines = vec![make_line(1, 1, 100.0), make_line(2, 1, 100.0)];
        let offer = make_offer(10.0, 2, OfferScope::StoreWide);

        let outcome = resolve(&lines, &[offer], None, Utc::now());

        assert_eq!(outcome.discount, 20.0);
    }

    #[test]
    fn test_expired_offer_does_not_apply() {
        let lines = vec![make_line(1, 2, 100.0)];
        let mut offer = make_offer(10.0, 1, OfferScope::StoreWide);
        offer.starts_at = Utc::now() - Duration::days(10);
        offer.ends_at = Utc::now() - Duration::days(3);

        let outcome = resolve(&lines, &[offer], None, Utc::now());

        assert_eq!(outcome.discount, 0.0);
    }

    #[test]
    fn test_offer_valid_through_end_of_its_last_day() {
        let lines = vec![make_line(1, 2, 100.0)];
        let mut offer = make_offer(10.0, 1, OfferScope::StoreWide);
        // Window nominally ended at midnight today; still valid all day
        offer.starts_at = Utc::now() - Duration::days(5);
        offer.ends_at = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|t| Utc.from_utc_datetime(&t))
            .unwrap();

        let outcome = resolve(&lines, &[offer], None, Utc::now());

        assert_eq!(outcome.discount, 20.0);
    }

    #[test]
    fn test_not_yet_started_offer_does_not_apply() {
        let lines = vec![make_line(1, 2, 100.0)];
        let mut offer = make_offer(10.0, 1, OfferScope::StoreWide);
        offer.starts_at = Utc::now() + Duration::days(1);
        offer.ends_at = Utc::now() + Duration::days(5);

        let outcome = resolve(&lines, &[offer], None, Utc::now());

        assert_eq!(outcome.discount, 0.0);
    }

    #[test]
    fn test_usage_capped_offer_does_not_apply() {
        let lines = vec![make_line(1, 2, 100.0)];
        let mut offer = make_offer(10.0, 1, OfferScope::StoreWide);
        offer.usage_limit = Some(3);
        offer.used_count = 3;

        let outcome = resolve(&lines, &[offer], None, Utc::now());

        assert_eq!(outcome.discount, 0.0);
    }

    #[test]
    fn test_inactive_offer_does_not_apply() {
        let lines = vec![make_line(1, 2, 100.0)];
        let mut offer = make_offer(10.0, 1, OfferScope::StoreWide);
        offer.is_active = false;

        let outcome = resolve(&lines, &[offer], None, Utc::now());

        assert_eq!(outcome.discount, 0.0);
    }

    #[test]
    fn test_offers_stack_additively() {
        let lines = vec![make_line(1, 2, 100.0)];
        let first = make_offer(10.0, 1, OfferScope::StoreWide);
        let mut second = make_offer(5.0, 1, OfferScope::StoreWide);
        second.id = 2;

        let outcome = resolve(&lines, &[first, second], None, Utc::now());

        // 10% + 5% of 200
        assert_eq!(outcome.discount, 30.0);
        assert_eq!(outcome.applied_offer_ids, vec![1, 2]);
    }

    #[test]
    fn test_coupon_adds_on_top_of_offers() {
        let lines = vec![make_line(1, 2, 100.0)];
        let offer = make_offer(10.0, 1, OfferScope::StoreWide);
        let coupon = make_coupon(15.0);

        let outcome = resolve(&lines, &[offer], Some(&coupon), Utc::now());

        // 10% offer + 15% coupon, both over the 200 subtotal
        assert_eq!(outcome.discount, 50.0);
        assert!(outcome.coupon_applied);
    }

    #[test]
    fn test_exhausted_coupon_is_skipped() {
        let lines = vec![make_line(1, 1, 100.0)];
        let mut coupon = make_coupon(15.0);
        coupon.max_uses = Some(1);
        coupon.used_count = 1;

        let outcome = resolve(&lines, &[], Some(&coupon), Utc::now());

        assert_eq!(outcome.discount, 0.0);
        assert!(!outcome.coupon_applied);
    }

    #[test]
    fn test_same_inputs_same_output() {
        let lines = vec![make_line(1, 2, 99.99), make_line(2, 1, 49.5)];
        let offers = vec![
            make_offer(10.0, 1, OfferScope::StoreWide),
            make_offer(5.0, 2, OfferScope::Products(vec![2])),
        ];
        let coupon = make_coupon(20.0);
        let now = Utc::now();

        let first = resolve(&lines, &offers, Some(&coupon), now);
        let second = resolve(&lines, &offers, Some(&coupon), now);

        assert_eq!(first.discount, second.discount);
        assert_eq!(first.applied_offer_ids, second.applied_offer_ids);
        assert_eq!(first.coupon_applied, second.coupon_applied);
    }
}

//! Fulfillment engine - checkout and status transition processing
//!
//! This module handles:
//! - Splitting a cart into per-vendor orders
//! - All-or-nothing stock validation and decrement
//! - Discount application and usage-counter movement
//! - Commission, totals and wallet/points side effects
//! - The order status state machine with role rules
//!
//! # Checkout Flow
//!
//! ```text
//! checkout(request)
//!     ├─ 1. Validate shipping address (before any mutation)
//!     ├─ 2. Simulated card capture (outside the transaction)
//!     ├─ 3. Begin write transaction (exclusive writer)
//!     ├─ 4. Load cart + product snapshots, group by vendor
//!     ├─ 5. Validate stock across every group (all-or-nothing)
//!     ├─ 6. Resolve coupon (soft-fail)
//!     ├─ 7. Per group: discounts → totals → order + items → stock
//!     │     decrement → wallet credit + points (when paid)
//!     ├─ 8. Clear cart
//!     ├─ 9. Commit
//!     └─ 10. Notify vendor / customer / admins (best-effort)
//! ```
//!
//! A failure anywhere before step 9 drops the transaction uncommitted:
//! no orders, no stock movement, no counter increments, no wallet credit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use validator::Validate;

use shared::models::points::{PointsSummary, UserPoints};
use shared::models::wallet::WalletSummary;
use shared::models::{Product, Role};
use shared::order::{
    CheckoutRequest, Order, OrderDetail, OrderItem, OrderStatus, PaymentMethod, PaymentStatus,
};
use shared::util::now_millis;

use super::checkout;
use super::error::{OrderError, OrderResult};
use super::money;
use super::status;
use crate::discounts;
use crate::notify::Notifier;
use crate::points::{PointsError, PointsLedger};
use crate::storage::{MarketStore, StoreError, StoreResult};
use crate::wallet::WalletLedger;

/// Fulfillment engine
///
/// Owns the checkout transaction and the status state machine. Cheap to
/// clone behind an `Arc`; every operation runs in exactly one redb write
/// transaction, so concurrent requests serialize on the single writer
/// and per-row invariants (stock, caps, balances) hold without extra
/// locking.
pub struct FulfillmentEngine {
    store: MarketStore,
    wallet: WalletLedger,
    points: PointsLedger,
    notifier: Arc<dyn Notifier>,
    /// Simulated payment gateway latency for card checkouts
    gateway_delay_ms: u64,
}

impl std::fmt::Debug for FulfillmentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FulfillmentEngine")
            .field("gateway_delay_ms", &self.gateway_delay_ms)
            .finish()
    }
}

impl FulfillmentEngine {
    pub fn new(
        store: MarketStore,
        notifier: Arc<dyn Notifier>,
        gateway_delay_ms: u64,
        points_rate: f64,
    ) -> Self {
        Self {
            wallet: WalletLedger::new(store.clone()),
            points: PointsLedger::new(store.clone(), points_rate),
            store,
            notifier,
            gateway_delay_ms,
        }
    }

    /// Generate a human-readable order number
    ///
    /// Embeds timestamp, vendor id and a random component so concurrent
    /// checkouts cannot collide.
    fn next_order_number(vendor_id: u64) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(0..1000);
        format!("ORD-{}-{}-{:03}", now_millis(), vendor_id, suffix)
    }

    // ========== Checkout ==========

    /// Turn the customer's cart into one order per vendor
    ///
    /// The whole checkout is one atomic transaction; a stock shortfall in
    /// any vendor group fails everything and leaves no partial state.
    pub async fn checkout(&self, req: CheckoutRequest) -> OrderResult<Vec<Order>> {
        req.validate()
            .map_err(|e| OrderError::InvalidAddress(e.to_string()))?;
        let customer_id = req.customer_id;
        let paid = req.payment_method == PaymentMethod::Card;

        // Simulated card capture runs before the transaction opens;
        // holding the exclusive writer through gateway latency would
        // serialize every checkout behind it.
        if paid && self.gateway_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.gateway_delay_ms)).await;
        }

        let txn = self.store.begin_write()?;

        let cart = self.store.cart_lines_txn(&txn, customer_id)?;
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        // Product snapshots for every referenced product
        let mut products: HashMap<u64, Product> = HashMap::new();
        for line in &cart {
            if products.contains_key(&line.product_id) {
                continue;
            }
            match self.store.get_product_txn(&txn, line.product_id)? {
                Some(product) => {
                    products.insert(product.id, product);
                }
                None => tracing::warn!(
                    product_id = line.product_id,
                    "Cart line references a missing product, dropping it"
                ),
            }
        }

        let groups = checkout::group_by_vendor(&cart, &products);
        checkout::validate_stock(&groups, &products)?;

        // Coupon resolution soft-fails: an expired code must not block checkout
        let coupon = match &req.coupon_code {
            Some(code) => match self.store.find_coupon_by_code_txn(&txn, code)? {
                Some(c) if c.is_usable() => Some(c),
                Some(_) => {
                    tracing::warn!(code = %code, "Coupon inactive or exhausted, proceeding without discount");
                    None
                }
                None => {
                    tracing::warn!(code = %code, "Unknown coupon code, proceeding without discount");
                    None
                }
            },
            None => None,
        };

        let now = Utc::now();
        let mut created: Vec<(Order, Option<u64>)> = Vec::with_capacity(groups.len());

        for group in &groups {
            let vendor = self.store.get_vendor_txn(&txn, group.vendor_id)?;
            let (shipping_cost, commission_rate, vendor_user_id) = match &vendor {
                Some(v) => (v.shipping_cost, v.commission_rate, Some(v.user_id)),
                None => {
                    tracing::warn!(
                        vendor_id = group.vendor_id,
                        "Vendor record missing, using zero shipping and commission"
                    );
                    (0.0, 0.0, None)
                }
            };

            let offers = self.store.active_offers_for_vendor_txn(&txn, group.vendor_id)?;
            let vendor_coupon = coupon.as_ref().filter(|c| c.vendor_id == group.vendor_id);
            let outcome = discounts::resolve(&group.lines, &offers, vendor_coupon, now);

            // Usage counters move in the same transaction that validated
            // the caps; the exclusive writer keeps them exact under
            // concurrent checkouts.
            for offer_id in &outcome.applied_offer_ids {
                if let Some(mut offer) = self.store.get_offer_txn(&txn, *offer_id)? {
                    offer.used_count += 1;
                    self.store.put_offer_txn(&txn, &offer)?;
                }
            }
            if outcome.coupon_applied
                && let Some(c) = vendor_coupon
            {
                let mut c = (*c).clone();
                c.used_count += 1;
                self.store.put_coupon_txn(&txn, &c)?;
            }

            let draft = checkout::price_group(group, &outcome, shipping_cost, commission_rate);

            let order_id = self.store.next_id(&txn, "order")?;
            let order = Order {
                id: order_id,
                order_number: Self::next_order_number(group.vendor_id),
                customer_id,
                vendor_id: group.vendor_id,
                status: if paid {
                    OrderStatus::Confirmed
                } else {
                    OrderStatus::Pending
                },
                payment_status: if paid {
                    PaymentStatus::Paid
                } else {
                    PaymentStatus::Pending
                },
                payment_method: req.payment_method,
                subtotal: draft.subtotal,
                discount: draft.discount,
                shipping_cost: draft.shipping_cost,
                commission: draft.commission,
                total: draft.total,
                points_awarded: paid,
                shipping_address: req.shipping_address.clone(),
                created_at: now_millis(),
                updated_at: now_millis(),
            };
            self.store.put_order_txn(&txn, &order)?;

            let items: Vec<OrderItem> = group
                .lines
                .iter()
                .map(|line| OrderItem {
                    order_id,
                    product_id: line.product_id,
                    vendor_id: line.vendor_id,
                    quantity: line.quantity,
                    price: line.unit_price,
                    total: line.line_total,
                    size: line.size.clone(),
                })
                .collect();
            self.store.put_order_items_txn(&txn, order_id, &items)?;

            // Decrement stock, clamped at zero
            for line in &group.lines {
                if let Some(mut product) = self.store.get_product_txn(&txn, line.product_id)? {
                    checkout::apply_stock_decrement(
                        &mut product,
                        line.quantity,
                        line.size.as_deref(),
                    );
                    self.store.put_product_txn(&txn, &product)?;
                }
            }

            // Paid orders credit the vendor's pending bucket and award
            // loyalty points immediately; COD settles both at delivery.
            if paid {
                let net = money::vendor_net(draft.subtotal, draft.discount, draft.commission);
                self.wallet
                    .credit_pending(&txn, group.vendor_id, order_id, net)?;
                self.points.earn(&txn, customer_id, order.total, order_id)?;
            }

            created.push((order, vendor_user_id));
        }

        // Cart is cleared only once every vendor group succeeded
        self.store.clear_cart_txn(&txn, customer_id)?;
        txn.commit().map_err(StoreError::from)?;

        // Post-commit notification fan-out; failures are logged inside
        // the notifier and never reach the caller.
        for (order, vendor_user_id) in &created {
            if let Some(vendor_user_id) = vendor_user_id {
                self.notifier
                    .notify(
                        *vendor_user_id,
                        "new_order",
                        "New order!",
                        &format!(
                            "You have a new order #{} worth {:.2}",
                            order.order_number, order.subtotal
                        ),
                        Some(order.id),
                    )
                    .await;
            }
            self.notifier
                .notify(
                    customer_id,
                    "order_created",
                    "Order received",
                    &format!("Your order #{} was received successfully", order.order_number),
                    Some(order.id),
                )
                .await;
            self.notifier
                .notify_admins(
                    "new_order_admin",
                    "New order in the system",
                    &format!(
                        "Order #{} created for customer {}",
                        order.order_number, customer_id
                    ),
                    Some(order.id),
                )
                .await;
        }

        tracing::info!(
            customer_id,
            orders = created.len(),
            method = ?req.payment_method,
            "Checkout completed"
        );
        Ok(created.into_iter().map(|(order, _)| order).collect())
    }

    // ========== Status transitions ==========

    /// Advance an order through its lifecycle
    ///
    /// Step ordering is validated first, then role rules: a vendor caller
    /// must own the order and may never set `delivered`. Delivery settles
    /// the vendor wallet and awards points exactly once per order.
    pub async fn update_status(
        &self,
        order_id: u64,
        new_status: OrderStatus,
        caller_user_id: u64,
    ) -> OrderResult<Order> {
        let txn = self.store.begin_write()?;
        let mut order = self
            .store
            .get_order_txn(&txn, order_id)?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        status::check_transition(order.status, new_status)?;

        let vendor = self.store.get_vendor_txn(&txn, order.vendor_id)?;
        let vendor_user_id = vendor.as_ref().map(|v| v.user_id);

        if let Some(caller) = self.store.get_user_txn(&txn, caller_user_id)?
            && caller.role == Role::Vendor
        {
            if Some(caller.id) != vendor_user_id {
                return Err(OrderError::NotAuthorized);
            }
            if new_status == OrderStatus::Delivered {
                return Err(OrderError::VendorCannotDeliver);
            }
        }

        let previous = order.status;
        order.status = new_status;
        order.updated_at = now_millis();

        if new_status == OrderStatus::Delivered {
            // Cash on delivery completes payment implicitly at delivery
            order.payment_status = PaymentStatus::Paid;

            let net = money::vendor_net(order.subtotal, order.discount, order.commission);
            self.wallet.settle(&txn, order.vendor_id, order.id, net)?;

            if !order.points_awarded {
                self.points
                    .earn(&txn, order.customer_id, order.total, order.id)?;
                order.points_awarded = true;
            }
        }

        self.store.put_order_txn(&txn, &order)?;
        txn.commit().map_err(StoreError::from)?;

        self.notifier
            .notify(
                order.customer_id,
                "order_status",
                "Order status updated",
                &format!("Your order #{} is now {}", order.order_number, new_status),
                Some(order.id),
            )
            .await;
        if new_status == OrderStatus::Delivered
            && let Some(vendor_user_id) = vendor_user_id
        {
            self.notifier
                .notify(
                    vendor_user_id,
                    "order_delivered",
                    "Order delivered",
                    &format!(
                        "The customer confirmed receipt of order #{}",
                        order.order_number
                    ),
                    Some(order.id),
                )
                .await;
        }

        tracing::info!(order_id, from = %previous, to = %new_status, "Order status updated");
        Ok(order)
    }

    // ========== Queries ==========

    /// A customer's orders, newest first
    pub fn list_orders(
        &self,
        customer_id: u64,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Order>> {
        self.store.orders_for_customer(customer_id, limit, offset)
    }

    /// One order with its line items
    pub fn get_order(&self, order_id: u64) -> OrderResult<OrderDetail> {
        let order = self
            .store
            .get_order(order_id)?
            .ok_or(OrderError::OrderNotFound(order_id))?;
        let items = self.store.items_for_order(order_id)?;
        Ok(OrderDetail { order, items })
    }

    /// Vendor wallet balances plus transaction log
    pub fn get_wallet(&self, vendor_id: u64) -> StoreResult<WalletSummary> {
        self.wallet.get(vendor_id)
    }

    /// Customer point balance plus history
    pub fn get_points(&self, user_id: u64) -> StoreResult<PointsSummary> {
        self.points.get(user_id)
    }

    /// Spend loyalty points
    pub fn spend_points(
        &self,
        user_id: u64,
        amount: i64,
        description: &str,
    ) -> Result<UserPoints, PointsError> {
        self.points.spend(user_id, amount, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::StoreNotifier;
    use shared::models::{CartLine, Role, User, Vendor};
    use shared::order::ShippingAddress;

    fn make_engine() -> (FulfillmentEngine, MarketStore) {
        let store = MarketStore::open_in_memory().unwrap();
        let notifier = Arc::new(StoreNotifier::new(store.clone()));
        let engine = FulfillmentEngine::new(store.clone(), notifier, 0, 0.1);
        (engine, store)
    }

    fn make_address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Test Customer".to_string(),
            phone: "0100000000".to_string(),
            city: "Cairo".to_string(),
            street: "1 Test St".to_string(),
            notes: None,
        }
    }

    fn make_request(customer_id: u64, method: PaymentMethod) -> CheckoutRequest {
        CheckoutRequest {
            customer_id,
            shipping_address: make_address(),
            payment_method: method,
            coupon_code: None,
        }
    }

    fn seed_vendor(store: &MarketStore) -> Vendor {
        let owner = store
            .create_user(User {
                id: 0,
                name: "Vendor Owner".to_string(),
                role: Role::Vendor,
                created_at: 0,
            })
            .unwrap();
        store
            .create_vendor(Vendor {
                id: 0,
                user_id: owner.id,
                store_name_ar: "متجر".to_string(),
                store_name_en: "Store".to_string(),
                shipping_cost: 25.0,
                commission_rate: 10.0,
                is_active: true,
            })
            .unwrap()
    }

    fn seed_product(store: &MarketStore, vendor_id: u64, price: f64, stock: u32) -> Product {
        store
            .create_product(Product {
                id: 0,
                vendor_id,
                name_ar: "منتج".to_string(),
                name_en: "Product".to_string(),
                price,
                stock,
                sizes: vec![],
                is_active: true,
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_fails() {
        let (engine, _store) = make_engine();
        let result = engine.checkout(make_request(1, PaymentMethod::Cod)).await;
        assert!(matches!(result, Err(OrderError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_checkout_invalid_address_fails_before_anything() {
        let (engine, store) = make_engine();
        let vendor = seed_vendor(&store);
        let product = seed_product(&store, vendor.id, 100.0, 5);
        store
            .add_cart_line(
                1,
                &CartLine {
                    product_id: product.id,
                    quantity: 1,
                    size: None,
                    color: None,
                },
            )
            .unwrap();

        let mut req = make_request(1, PaymentMethod::Cod);
        req.shipping_address.city = String::new();

        let result = engine.checkout(req).await;
        assert!(matches!(result, Err(OrderError::InvalidAddress(_))));
        // Cart untouched
        assert_eq!(store.cart_lines(1).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_coupon_soft_fails() {
        let (engine, store) = make_engine();
        let vendor = seed_vendor(&store);
        let product = seed_product(&store, vendor.id, 100.0, 5);
        store
            .add_cart_line(
                1,
                &CartLine {
                    product_id: product.id,
                    quantity: 1,
                    size: None,
                    color: None,
                },
            )
            .unwrap();

        let mut req = make_request(1, PaymentMethod::Cod);
        req.coupon_code = Some("NO-SUCH-CODE".to_string());

        let orders = engine.checkout(req).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].discount, 0.0);
    }

    #[tokio::test]
    async fn test_vendor_cannot_deliver_own_order() {
        let (engine, store) = make_engine();
        let vendor = seed_vendor(&store);
        let product = seed_product(&store, vendor.id, 100.0, 5);
        store
            .add_cart_line(
                1,
                &CartLine {
                    product_id: product.id,
                    quantity: 1,
                    size: None,
                    color: None,
                },
            )
            .unwrap();

        let orders = engine
            .checkout(make_request(1, PaymentMethod::Cod))
            .await
            .unwrap();
        let order = &orders[0];

        let result = engine
            .update_status(order.id, OrderStatus::Delivered, vendor.user_id)
            .await;
        assert!(matches!(result, Err(OrderError::VendorCannotDeliver)));
    }

    #[tokio::test]
    async fn test_foreign_vendor_cannot_touch_order() {
        let (engine, store) = make_engine();
        let vendor = seed_vendor(&store);
        let other_vendor = seed_vendor(&store);
        let product = seed_product(&store, vendor.id, 100.0, 5);
        store
            .add_cart_line(
                1,
                &CartLine {
                    product_id: product.id,
                    quantity: 1,
                    size: None,
                    color: None,
                },
            )
            .unwrap();

        let orders = engine
            .checkout(make_request(1, PaymentMethod::Cod))
            .await
            .unwrap();

        let result = engine
            .update_status(orders[0].id, OrderStatus::Confirmed, other_vendor.user_id)
            .await;
        assert!(matches!(result, Err(OrderError::NotAuthorized)));
        // Status unchanged
        assert_eq!(
            store.get_order(orders[0].id).unwrap().unwrap().status,
            OrderStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_cod_points_awarded_exactly_once() {
        let (engine, store) = make_engine();
        let vendor = seed_vendor(&store);
        let product = seed_product(&store, vendor.id, 100.0, 5);
        let customer = store
            .create_user(User {
                id: 0,
                name: "Customer".to_string(),
                role: Role::Customer,
                created_at: 0,
            })
            .unwrap();
        store
            .add_cart_line(
                customer.id,
                &CartLine {
                    product_id: product.id,
                    quantity: 2,
                    size: None,
                    color: None,
                },
            )
            .unwrap();

        let orders = engine
            .checkout(make_request(customer.id, PaymentMethod::Cod))
            .await
            .unwrap();
        let order = &orders[0];
        assert!(!order.points_awarded);
        assert_eq!(engine.get_points(customer.id).unwrap().points, 0);

        engine
            .update_status(order.id, OrderStatus::Delivered, customer.id)
            .await
            .unwrap();
        let after_delivery = engine.get_points(customer.id).unwrap().points;
        assert!(after_delivery > 0);

        let stored = store.get_order(order.id).unwrap().unwrap();
        assert!(stored.points_awarded);
        assert_eq!(stored.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_order_number_embeds_vendor_id() {
        let number = FulfillmentEngine::next_order_number(7);
        assert!(number.starts_with("ORD-"));
        assert!(number.contains("-7-"));
    }
}

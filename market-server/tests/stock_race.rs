//! Concurrency stress tests: stock and usage caps under simultaneous
//! checkouts
//!
//! The engine's single write transaction per checkout must guarantee
//! that stock never goes negative and capped coupons never exceed their
//! cap, no matter how checkouts interleave.

use std::sync::Arc;

use market_server::{FulfillmentEngine, MarketStore, StoreNotifier};
use shared::models::{CartLine, Coupon, Product, Role, User, Vendor};
use shared::order::{CheckoutRequest, PaymentMethod, ShippingAddress};

fn setup() -> (Arc<FulfillmentEngine>, MarketStore) {
    let store = MarketStore::open_in_memory().unwrap();
    let notifier = Arc::new(StoreNotifier::new(store.clone()));
    let engine = Arc::new(FulfillmentEngine::new(store.clone(), notifier, 0, 0.1));
    (engine, store)
}

fn seed_vendor_with_product(store: &MarketStore, price: f64, stock: u32) -> (Vendor, Product) {
    let owner = store
        .create_user(User {
            id: 0,
            name: "owner".to_string(),
            role: Role::Vendor,
            created_at: 0,
        })
        .unwrap();
    let vendor = store
        .create_vendor(Vendor {
            id: 0,
            user_id: owner.id,
            store_name_ar: "متجر".to_string(),
            store_name_en: "Store".to_string(),
            shipping_cost: 0.0,
            commission_rate: 0.0,
            is_active: true,
        })
        .unwrap();
    let product = store
        .create_product(Product {
            id: 0,
            vendor_id: vendor.id,
            name_ar: "منتج".to_string(),
            name_en: "Product".to_string(),
            price,
            stock,
            sizes: vec![],
            is_active: true,
        })
        .unwrap();
    (vendor, product)
}

fn request(customer_id: u64, coupon_code: Option<&str>) -> CheckoutRequest {
    CheckoutRequest {
        customer_id,
        shipping_address: ShippingAddress {
            full_name: "Racer".to_string(),
            phone: "0100000000".to_string(),
            city: "Cairo".to_string(),
            street: "1 Race St".to_string(),
            notes: None,
        },
        payment_method: PaymentMethod::Cod,
        coupon_code: coupon_code.map(|c| c.to_string()),
    }
}

fn fill_cart(store: &MarketStore, customer_id: u64, product_id: u64, quantity: u32) {
    store
        .add_cart_line(
            customer_id,
            &CartLine {
                product_id,
                quantity,
                size: None,
                color: None,
            },
        )
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_checkouts_race_for_last_unit() {
    let (engine, store) = setup();
    let (_vendor, product) = seed_vendor_with_product(&store, 100.0, 1);

    fill_cart(&store, 11, product.id, 1);
    fill_cart(&store, 12, product.id, 1);

    let mut handles = Vec::new();
    for customer_id in [11u64, 12] {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.checkout(request(customer_id, None)).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    // Exactly one checkout wins the last unit
    assert_eq!(successes, 1);
    assert_eq!(store.get_product(product.id).unwrap().unwrap().stock, 0);

    let total_orders = store.orders_for_customer(11, 10, 0).unwrap().len()
        + store.orders_for_customer(12, 10, 0).unwrap().len();
    assert_eq!(total_orders, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_checkouts_never_oversell() {
    let (engine, store) = setup();
    let initial_stock = 5u32;
    let per_order = 2u32;
    let (_vendor, product) = seed_vendor_with_product(&store, 30.0, initial_stock);

    let customers: Vec<u64> = (101..=104).collect();
    for customer_id in &customers {
        fill_cart(&store, *customer_id, product.id, per_order);
    }

    let mut handles = Vec::new();
    for customer_id in customers.clone() {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.checkout(request(customer_id, None)).await
        }));
    }
    for handle in handles {
        let _ = handle.await.unwrap();
    }

    // Sum of sold quantities never exceeds the starting stock
    let mut sold = 0u32;
    for customer_id in &customers {
        for order in store.orders_for_customer(*customer_id, 10, 0).unwrap() {
            for item in store.items_for_order(order.id).unwrap() {
                sold += item.quantity;
            }
        }
    }
    assert!(sold <= initial_stock, "sold {} of {}", sold, initial_stock);

    let remaining = store.get_product(product.id).unwrap().unwrap().stock;
    assert_eq!(remaining, initial_stock - sold);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_capped_coupon_discounts_exactly_one_order() {
    let (engine, store) = setup();
    let (vendor, product) = seed_vendor_with_product(&store, 100.0, 100);
    store
        .create_coupon(Coupon {
            id: 0,
            vendor_id: vendor.id,
            code: "ONCE".to_string(),
            discount_percent: 10.0,
            max_uses: Some(1),
            used_count: 0,
            is_active: true,
        })
        .unwrap();

    let customers: Vec<u64> = (101..=104).collect();
    for customer_id in &customers {
        fill_cart(&store, *customer_id, product.id, 1);
    }

    let mut handles = Vec::new();
    for customer_id in customers.clone() {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.checkout(request(customer_id, Some("ONCE"))).await
        }));
    }
    for handle in handles {
        // Coupon exhaustion is non-fatal; every checkout succeeds
        assert!(handle.await.unwrap().is_ok());
    }

    let mut discounted = 0;
    for customer_id in &customers {
        for order in store.orders_for_customer(*customer_id, 10, 0).unwrap() {
            if order.discount > 0.0 {
                discounted += 1;
            }
        }
    }
    assert_eq!(discounted, 1);

    let coupons = store.list_coupons_for_vendor(vendor.id).unwrap();
    assert_eq!(coupons[0].used_count, 1);
}

//! redb-based storage layer for the marketplace
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `users` | `user_id` | `User` | Accounts and roles |
//! | `vendors` | `vendor_id` | `Vendor` | Store profiles |
//! | `products` | `product_id` | `Product` | Listings + stock |
//! | `cart_items` | `(customer_id, line_id)` | `CartLine` | Live carts |
//! | `coupons` | `coupon_id` | `Coupon` | Code-gated discounts |
//! | `coupon_codes` | `code` | `coupon_id` | Unique-code index |
//! | `offers` | `offer_id` | `Offer` | Automatic discounts |
//! | `orders` | `order_id` | `Order` | Order records |
//! | `order_items` | `(order_id, idx)` | `OrderItem` | Purchase snapshots |
//! | `notifications` | `(user_id, seq)` | `Notification` | User events |
//! | `counters` | name | `u64` | Id allocation |
//!
//! Wallet and points tables are defined next to their ledgers (see
//! [`crate::wallet`] and [`crate::points`]) and initialized here.
//!
//! # Atomicity
//!
//! redb commits are durable as soon as `commit()` returns and the single
//! write transaction is exclusive. Checkout and status transitions each
//! run inside exactly one write transaction, which is what serializes
//! concurrent checkouts against the same stock row and keeps coupon and
//! offer usage caps exact.

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use shared::error::AppError;
use shared::models::{CartLine, Coupon, Notification, Offer, Product, Role, User, Vendor};
use shared::order::{Order, OrderItem};
use shared::util::now_millis;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const USERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("users");
const VENDORS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("vendors");
const PRODUCTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("products");
const CART_ITEMS_TABLE: TableDefinition<(u64, u64), &[u8]> =
    TableDefinition::new("cart_items");
const COUPONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("coupons");
const COUPON_CODES_TABLE: TableDefinition<&str, u64> = TableDefinition::new("coupon_codes");
const OFFERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("offers");
const ORDERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("orders");
const ORDER_ITEMS_TABLE: TableDefinition<(u64, u32), &[u8]> =
    TableDefinition::new("order_items");
const NOTIFICATIONS_TABLE: TableDefinition<(u64, u64), &[u8]> =
    TableDefinition::new("notifications");
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => AppError::Conflict(msg),
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Database(other.to_string()),
        }
    }
}

/// Marketplace storage backed by redb
///
/// Cheap to clone; all clones share the same database handle.
#[derive(Clone)]
pub struct MarketStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for MarketStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketStore").finish()
    }
}

impl MarketStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (tests and ephemeral runs)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Create all tables so later read transactions never race table creation
    fn init_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let _ = txn.open_table(USERS_TABLE)?;
            let _ = txn.open_table(VENDORS_TABLE)?;
            let _ = txn.open_table(PRODUCTS_TABLE)?;
            let _ = txn.open_table(CART_ITEMS_TABLE)?;
            let _ = txn.open_table(COUPONS_TABLE)?;
            let _ = txn.open_table(COUPON_CODES_TABLE)?;
            let _ = txn.open_table(OFFERS_TABLE)?;
            let _ = txn.open_table(ORDERS_TABLE)?;
            let _ = txn.open_table(ORDER_ITEMS_TABLE)?;
            let _ = txn.open_table(NOTIFICATIONS_TABLE)?;
            let _ = txn.open_table(COUNTERS_TABLE)?;
            let _ = txn.open_table(crate::wallet::WALLETS_TABLE)?;
            let _ = txn.open_table(crate::wallet::WALLET_TXNS_TABLE)?;
            let _ = txn.open_table(crate::points::POINTS_TABLE)?;
            let _ = txn.open_table(crate::points::POINTS_TXNS_TABLE)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction (exclusive writer)
    pub fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Underlying database handle (read transactions)
    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    // ========== Counters ==========

    /// Allocate the next id for a counter (within transaction)
    pub fn next_id(&self, txn: &WriteTransaction, counter: &str) -> StoreResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(counter)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(counter, next)?;
        Ok(next)
    }

    // ========== Users ==========

    pub fn put_user_txn(&self, txn: &WriteTransaction, user: &User) -> StoreResult<()> {
        let mut table = txn.open_table(USERS_TABLE)?;
        table.insert(user.id, serde_json::to_vec(user)?.as_slice())?;
        Ok(())
    }

    /// Create a user, allocating its id
    pub fn create_user(&self, mut user: User) -> StoreResult<User> {
        let txn = self.begin_write()?;
        user.id = self.next_id(&txn, "user")?;
        user.created_at = now_millis();
        self.put_user_txn(&txn, &user)?;
        txn.commit()?;
        Ok(user)
    }

    pub fn get_user(&self, id: u64) -> StoreResult<Option<User>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(USERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_user_txn(&self, txn: &WriteTransaction, id: u64) -> StoreResult<Option<User>> {
        let table = txn.open_table(USERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All admin account ids (notification fan-out)
    pub fn list_admin_ids(&self) -> StoreResult<Vec<u64>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(USERS_TABLE)?;
        let mut ids = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let user: User = serde_json::from_slice(value.value())?;
            if user.role == Role::Admin {
                ids.push(user.id);
            }
        }
        Ok(ids)
    }

    // ========== Vendors ==========

    pub fn put_vendor_txn(&self, txn: &WriteTransaction, vendor: &Vendor) -> StoreResult<()> {
        let mut table = txn.open_table(VENDORS_TABLE)?;
        table.insert(vendor.id, serde_json::to_vec(vendor)?.as_slice())?;
        Ok(())
    }

    pub fn create_vendor(&self, mut vendor: Vendor) -> StoreResult<Vendor> {
        let txn = self.begin_write()?;
        vendor.id = self.next_id(&txn, "vendor")?;
        self.put_vendor_txn(&txn, &vendor)?;
        txn.commit()?;
        Ok(vendor)
    }

    pub fn get_vendor(&self, id: u64) -> StoreResult<Option<Vendor>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(VENDORS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_vendor_txn(&self, txn: &WriteTransaction, id: u64) -> StoreResult<Option<Vendor>> {
        let table = txn.open_table(VENDORS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn list_vendors(&self) -> StoreResult<Vec<Vendor>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(VENDORS_TABLE)?;
        let mut vendors = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            vendors.push(serde_json::from_slice(value.value())?);
        }
        Ok(vendors)
    }

    // ========== Products ==========

    pub fn put_product_txn(&self, txn: &WriteTransaction, product: &Product) -> StoreResult<()> {
        let mut table = txn.open_table(PRODUCTS_TABLE)?;
        table.insert(product.id, serde_json::to_vec(product)?.as_slice())?;
        Ok(())
    }

    pub fn create_product(&self, mut product: Product) -> StoreResult<Product> {
        let txn = self.begin_write()?;
        product.id = self.next_id(&txn, "product")?;
        self.put_product_txn(&txn, &product)?;
        txn.commit()?;
        Ok(product)
    }

    pub fn get_product(&self, id: u64) -> StoreResult<Option<Product>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(PRODUCTS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_product_txn(
        &self,
        txn: &WriteTransaction,
        id: u64,
    ) -> StoreResult<Option<Product>> {
        let table = txn.open_table(PRODUCTS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn list_products(&self) -> StoreResult<Vec<Product>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(PRODUCTS_TABLE)?;
        let mut products = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            products.push(serde_json::from_slice(value.value())?);
        }
        Ok(products)
    }

    // ========== Cart ==========

    /// Append a line to a customer's cart, returning the line id
    pub fn add_cart_line(&self, customer_id: u64, line: &CartLine) -> StoreResult<u64> {
        let txn = self.begin_write()?;
        let line_id = self.next_id(&txn, "cart_line")?;
        {
            let mut table = txn.open_table(CART_ITEMS_TABLE)?;
            table.insert((customer_id, line_id), serde_json::to_vec(line)?.as_slice())?;
        }
        txn.commit()?;
        Ok(line_id)
    }

    pub fn cart_lines(&self, customer_id: u64) -> StoreResult<Vec<CartLine>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(CART_ITEMS_TABLE)?;
        let mut lines = Vec::new();
        for result in table.range((customer_id, 0u64)..=(customer_id, u64::MAX))? {
            let (_key, value) = result?;
            lines.push(serde_json::from_slice(value.value())?);
        }
        Ok(lines)
    }

    pub fn cart_lines_txn(
        &self,
        txn: &WriteTransaction,
        customer_id: u64,
    ) -> StoreResult<Vec<CartLine>> {
        let table = txn.open_table(CART_ITEMS_TABLE)?;
        let mut lines = Vec::new();
        for result in table.range((customer_id, 0u64)..=(customer_id, u64::MAX))? {
            let (_key, value) = result?;
            lines.push(serde_json::from_slice(value.value())?);
        }
        Ok(lines)
    }

    /// Delete all of a customer's cart lines (within transaction)
    pub fn clear_cart_txn(&self, txn: &WriteTransaction, customer_id: u64) -> StoreResult<()> {
        let mut table = txn.open_table(CART_ITEMS_TABLE)?;
        let mut keys: Vec<(u64, u64)> = Vec::new();
        for result in table.range((customer_id, 0u64)..=(customer_id, u64::MAX))? {
            let (key, _value) = result?;
            keys.push(key.value());
        }
        for key in keys {
            table.remove(key)?;
        }
        Ok(())
    }

    pub fn clear_cart(&self, customer_id: u64) -> StoreResult<()> {
        let txn = self.begin_write()?;
        self.clear_cart_txn(&txn, customer_id)?;
        txn.commit()?;
        Ok(())
    }

    // ========== Coupons ==========

    /// Create a coupon; the code must be unused
    pub fn create_coupon(&self, mut coupon: Coupon) -> StoreResult<Coupon> {
        let txn = self.begin_write()?;
        {
            let codes = txn.open_table(COUPON_CODES_TABLE)?;
            if codes.get(coupon.code.as_str())?.is_some() {
                return Err(StoreError::Duplicate(format!(
                    "Coupon code {} already exists",
                    coupon.code
                )));
            }
        }
        coupon.id = self.next_id(&txn, "coupon")?;
        {
            let mut codes = txn.open_table(COUPON_CODES_TABLE)?;
            codes.insert(coupon.code.as_str(), coupon.id)?;
        }
        self.put_coupon_txn(&txn, &coupon)?;
        txn.commit()?;
        Ok(coupon)
    }

    pub fn put_coupon_txn(&self, txn: &WriteTransaction, coupon: &Coupon) -> StoreResult<()> {
        let mut table = txn.open_table(COUPONS_TABLE)?;
        table.insert(coupon.id, serde_json::to_vec(coupon)?.as_slice())?;
        Ok(())
    }

    pub fn get_coupon_txn(&self, txn: &WriteTransaction, id: u64) -> StoreResult<Option<Coupon>> {
        let table = txn.open_table(COUPONS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Resolve a coupon by its unique code (within transaction)
    pub fn find_coupon_by_code_txn(
        &self,
        txn: &WriteTransaction,
        code: &str,
    ) -> StoreResult<Option<Coupon>> {
        let coupon_id = {
            let codes = txn.open_table(COUPON_CODES_TABLE)?;
            codes.get(code)?.map(|g| g.value())
        };
        match coupon_id {
            Some(id) => self.get_coupon_txn(txn, id),
            None => Ok(None),
        }
    }

    pub fn list_coupons_for_vendor(&self, vendor_id: u64) -> StoreResult<Vec<Coupon>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(COUPONS_TABLE)?;
        let mut coupons = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let coupon: Coupon = serde_json::from_slice(value.value())?;
            if coupon.vendor_id == vendor_id {
                coupons.push(coupon);
            }
        }
        Ok(coupons)
    }

    // ========== Offers ==========

    pub fn create_offer(&self, mut offer: Offer) -> StoreResult<Offer> {
        let txn = self.begin_write()?;
        offer.id = self.next_id(&txn, "offer")?;
        self.put_offer_txn(&txn, &offer)?;
        txn.commit()?;
        Ok(offer)
    }

    pub fn put_offer_txn(&self, txn: &WriteTransaction, offer: &Offer) -> StoreResult<()> {
        let mut table = txn.open_table(OFFERS_TABLE)?;
        table.insert(offer.id, serde_json::to_vec(offer)?.as_slice())?;
        Ok(())
    }

    pub fn get_offer_txn(&self, txn: &WriteTransaction, id: u64) -> StoreResult<Option<Offer>> {
        let table = txn.open_table(OFFERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Active offers for a vendor (within transaction)
    pub fn active_offers_for_vendor_txn(
        &self,
        txn: &WriteTransaction,
        vendor_id: u64,
    ) -> StoreResult<Vec<Offer>> {
        let table = txn.open_table(OFFERS_TABLE)?;
        let mut offers = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let offer: Offer = serde_json::from_slice(value.value())?;
            if offer.vendor_id == vendor_id && offer.is_active {
                offers.push(offer);
            }
        }
        Ok(offers)
    }

    pub fn list_offers_for_vendor(&self, vendor_id: u64) -> StoreResult<Vec<Offer>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(OFFERS_TABLE)?;
        let mut offers = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let offer: Offer = serde_json::from_slice(value.value())?;
            if offer.vendor_id == vendor_id {
                offers.push(offer);
            }
        }
        Ok(offers)
    }

    // ========== Orders ==========

    pub fn put_order_txn(&self, txn: &WriteTransaction, order: &Order) -> StoreResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        table.insert(order.id, serde_json::to_vec(order)?.as_slice())?;
        Ok(())
    }

    pub fn get_order(&self, id: u64) -> StoreResult<Option<Order>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_order_txn(&self, txn: &WriteTransaction, id: u64) -> StoreResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// A customer's orders, newest first
    pub fn orders_for_customer(
        &self,
        customer_id: u64,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Order>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(ORDERS_TABLE)?;
        let mut orders: Vec<Order> = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.customer_id == customer_id {
                orders.push(order);
            }
        }
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders.into_iter().skip(offset).take(limit).collect())
    }

    /// Store the line items of an order (within transaction)
    pub fn put_order_items_txn(
        &self,
        txn: &WriteTransaction,
        order_id: u64,
        items: &[OrderItem],
    ) -> StoreResult<()> {
        let mut table = txn.open_table(ORDER_ITEMS_TABLE)?;
        for (idx, item) in items.iter().enumerate() {
            table.insert((order_id, idx as u32), serde_json::to_vec(item)?.as_slice())?;
        }
        Ok(())
    }

    pub fn items_for_order(&self, order_id: u64) -> StoreResult<Vec<OrderItem>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(ORDER_ITEMS_TABLE)?;
        let mut items = Vec::new();
        for result in table.range((order_id, 0u32)..=(order_id, u32::MAX))? {
            let (_key, value) = result?;
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }

    // ========== Notifications ==========

    /// Append a notification row (own transaction, best-effort callers)
    pub fn push_notification(&self, notification: &Notification) -> StoreResult<()> {
        let txn = self.begin_write()?;
        let seq = self.next_id(&txn, "notification")?;
        {
            let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
            table.insert(
                (notification.user_id, seq),
                serde_json::to_vec(notification)?.as_slice(),
            )?;
        }
        txn.commit()?;
        Ok(())
    }

    /// A user's notifications, newest first
    pub fn notifications_for_user(&self, user_id: u64) -> StoreResult<Vec<Notification>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(NOTIFICATIONS_TABLE)?;
        let mut notifications = Vec::new();
        for result in table.range((user_id, 0u64)..=(user_id, u64::MAX))? {
            let (_key, value) = result?;
            notifications.push(serde_json::from_slice(value.value())?);
        }
        notifications.reverse();
        Ok(notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;

    fn make_user(name: &str, role: Role) -> User {
        User {
            id: 0,
            name: name.to_string(),
            role,
            created_at: 0,
        }
    }

    fn make_product(vendor_id: u64, price: f64, stock: u32) -> Product {
        Product {
            id: 0,
            vendor_id,
            name_ar: "منتج".to_string(),
            name_en: "Product".to_string(),
            price,
            stock,
            sizes: vec![],
            is_active: true,
        }
    }

    #[test]
    fn test_id_allocation_is_monotonic() {
        let store = MarketStore::open_in_memory().unwrap();
        let u1 = store.create_user(make_user("a", Role::Customer)).unwrap();
        let u2 = store.create_user(make_user("b", Role::Customer)).unwrap();
        assert_eq!(u2.id, u1.id + 1);
    }

    #[test]
    fn test_cart_roundtrip_and_clear() {
        let store = MarketStore::open_in_memory().unwrap();
        let line = CartLine {
            product_id: 7,
            quantity: 2,
            size: Some("M".to_string()),
            color: None,
        };
        store.add_cart_line(42, &line).unwrap();
        store.add_cart_line(42, &line).unwrap();
        // Another customer's cart stays untouched
        store.add_cart_line(43, &line).unwrap();

        assert_eq!(store.cart_lines(42).unwrap().len(), 2);

        store.clear_cart(42).unwrap();
        assert!(store.cart_lines(42).unwrap().is_empty());
        assert_eq!(store.cart_lines(43).unwrap().len(), 1);
    }

    #[test]
    fn test_coupon_code_uniqueness() {
        let store = MarketStore::open_in_memory().unwrap();
        let coupon = Coupon {
            id: 0,
            vendor_id: 1,
            code: "SAVE10".to_string(),
            discount_percent: 10.0,
            max_uses: None,
            used_count: 0,
            is_active: true,
        };
        store.create_coupon(coupon.clone()).unwrap();
        let result = store.create_coupon(coupon);
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
    }

    #[test]
    fn test_coupon_lookup_by_code() {
        let store = MarketStore::open_in_memory().unwrap();
        let created = store
            .create_coupon(Coupon {
                id: 0,
                vendor_id: 3,
                code: "WELCOME".to_string(),
                discount_percent: 15.0,
                max_uses: Some(1),
                used_count: 0,
                is_active: true,
            })
            .unwrap();

        let txn = store.begin_write().unwrap();
        let found = store.find_coupon_by_code_txn(&txn, "WELCOME").unwrap();
        assert_eq!(found.map(|c| c.id), Some(created.id));
        let missing = store.find_coupon_by_code_txn(&txn, "NOPE").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_admin_ids_filters_roles() {
        let store = MarketStore::open_in_memory().unwrap();
        store.create_user(make_user("c", Role::Customer)).unwrap();
        let admin = store.create_user(make_user("a", Role::Admin)).unwrap();
        store.create_user(make_user("v", Role::Vendor)).unwrap();
        assert_eq!(store.list_admin_ids().unwrap(), vec![admin.id]);
    }

    #[test]
    fn test_product_stock_update_in_txn() {
        let store = MarketStore::open_in_memory().unwrap();
        let mut product = store.create_product(make_product(1, 50.0, 10)).unwrap();

        let txn = store.begin_write().unwrap();
        product.stock = 4;
        store.put_product_txn(&txn, &product).unwrap();
        txn.commit().unwrap();

        assert_eq!(store.get_product(product.id).unwrap().unwrap().stock, 4);
    }
}

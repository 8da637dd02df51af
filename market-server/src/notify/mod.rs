//! Best-effort notification delivery
//!
//! The fulfillment engine fires notifications after its transaction
//! commits. Delivery is fire-and-forget: a failure is logged and never
//! propagates into the operation that produced the event.

use async_trait::async_trait;
use shared::models::Notification;
use shared::util::now_millis;

use crate::storage::MarketStore;

/// Notification sink consumed by the fulfillment engine
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one user-facing event; must never fail the caller
    async fn notify(
        &self,
        user_id: u64,
        kind: &str,
        title: &str,
        message: &str,
        related_id: Option<u64>,
    );

    /// Deliver an event to every admin account
    async fn notify_admins(&self, kind: &str, title: &str, message: &str, related_id: Option<u64>);
}

/// Store-backed notifier: persists notification rows for later reads
#[derive(Clone, Debug)]
pub struct StoreNotifier {
    store: MarketStore,
}

impl StoreNotifier {
    pub fn new(store: MarketStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Notifier for StoreNotifier {
    async fn notify(
        &self,
        user_id: u64,
        kind: &str,
        title: &str,
        message: &str,
        related_id: Option<u64>,
    ) {
        let notification = Notification {
            user_id,
            kind: kind.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            related_id,
            is_read: false,
            created_at: now_millis(),
        };
        if let Err(e) = self.store.push_notification(&notification) {
            tracing::warn!(user_id, kind, error = %e, "Notification delivery failed");
        }
    }

    async fn notify_admins(&self, kind: &str, title: &str, message: &str, related_id: Option<u64>) {
        let admin_ids = match self.store.list_admin_ids() {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(kind, error = %e, "Admin notification fan-out failed");
                return;
            }
        };
        let sends = admin_ids
            .into_iter()
            .map(|id| self.notify(id, kind, title, message, related_id));
        futures::future::join_all(sends).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Role, User};

    fn make_user(role: Role) -> User {
        User {
            id: 0,
            name: "user".to_string(),
            role,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn test_notify_persists_row() {
        let store = MarketStore::open_in_memory().unwrap();
        let notifier = StoreNotifier::new(store.clone());

        notifier
            .notify(5, "order_status", "Order update", "Shipped", Some(42))
            .await;

        let rows = store.notifications_for_user(5).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "order_status");
        assert_eq!(rows[0].related_id, Some(42));
        assert!(!rows[0].is_read);
    }

    #[tokio::test]
    async fn test_notify_admins_reaches_every_admin() {
        let store = MarketStore::open_in_memory().unwrap();
        let a1 = store.create_user(make_user(Role::Admin)).unwrap();
        let a2 = store.create_user(make_user(Role::Admin)).unwrap();
        store.create_user(make_user(Role::Customer)).unwrap();

        let notifier = StoreNotifier::new(store.clone());
        notifier
            .notify_admins("new_order_admin", "New order", "Order #1", Some(1))
            .await;

        assert_eq!(store.notifications_for_user(a1.id).unwrap().len(), 1);
        assert_eq!(store.notifications_for_user(a2.id).unwrap().len(), 1);
    }
}

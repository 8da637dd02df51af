//! Loyalty points ledger
//!
//! Per-customer point balance with an append-only transaction log.
//! Earning happens inside the fulfillment engine's transactions (payment
//! or delivery, never both - the order carries a `points_awarded`
//! marker); spending is an exposed operation of its own.

use redb::{ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::models::points::{PointsKind, PointsSummary, PointsTransaction, UserPoints};
use shared::util::now_millis;
use thiserror::Error;

use crate::storage::{MarketStore, StoreError, StoreResult};

pub(crate) const POINTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("points");
pub(crate) const POINTS_TXNS_TABLE: TableDefinition<(u64, u64), &[u8]> =
    TableDefinition::new("points_txns");

/// Default earn rate: 1 point for every 10 currency units spent
pub const DEFAULT_POINTS_PER_CURRENCY: f64 = 0.1;

/// Points ledger errors
#[derive(Debug, Error)]
pub enum PointsError {
    #[error("Not enough points: balance {balance}, requested {requested}")]
    Insufficient { balance: i64, requested: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PointsError> for shared::error::AppError {
    fn from(err: PointsError) -> Self {
        match err {
            PointsError::Insufficient { .. } => {
                shared::error::AppError::BusinessRule(err.to_string())
            }
            PointsError::Store(e) => e.into(),
        }
    }
}

/// Ledger over the points tables
#[derive(Clone, Debug)]
pub struct PointsLedger {
    store: MarketStore,
    /// Points earned per currency unit of order total
    rate: f64,
}

impl PointsLedger {
    pub fn new(store: MarketStore, rate: f64) -> Self {
        Self { store, rate }
    }

    fn get_or_create_txn(&self, txn: &WriteTransaction, user_id: u64) -> StoreResult<UserPoints> {
        let table = txn.open_table(POINTS_TABLE)?;
        match table.get(user_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(UserPoints::empty(user_id, now_millis())),
        }
    }

    fn put_points_txn(&self, txn: &WriteTransaction, points: &UserPoints) -> StoreResult<()> {
        let mut table = txn.open_table(POINTS_TABLE)?;
        table.insert(points.user_id, serde_json::to_vec(points)?.as_slice())?;
        Ok(())
    }

    fn append_txn(&self, txn: &WriteTransaction, record: &PointsTransaction) -> StoreResult<()> {
        let seq = self.store.next_id(txn, "points_txn")?;
        let mut table = txn.open_table(POINTS_TXNS_TABLE)?;
        table.insert(
            (record.user_id, seq),
            serde_json::to_vec(record)?.as_slice(),
        )?;
        Ok(())
    }

    /// Award points for an order total; no-op when the computed amount
    /// rounds down to zero. Returns the number of points awarded.
    pub fn earn(
        &self,
        txn: &WriteTransaction,
        user_id: u64,
        order_total: f64,
        order_id: u64,
    ) -> StoreResult<i64> {
        let amount = (order_total * self.rate).floor() as i64;
        if amount <= 0 {
            return Ok(0);
        }

        let mut points = self.get_or_create_txn(txn, user_id)?;
        points.points += amount;
        points.updated_at = now_millis();
        self.put_points_txn(txn, &points)?;

        self.append_txn(
            txn,
            &PointsTransaction {
                user_id,
                amount,
                kind: PointsKind::Earn,
                description: format!("Reward points for order #{}", order_id),
                created_at: now_millis(),
            },
        )?;

        tracing::info!(user_id, order_id, amount, "Loyalty points earned");
        Ok(amount)
    }

    /// Spend points; fails when the balance is below `amount`
    pub fn spend(
        &self,
        user_id: u64,
        amount: i64,
        description: &str,
    ) -> Result<UserPoints, PointsError> {
        let txn = self.store.begin_write()?;
        let mut points = self.get_or_create_txn(&txn, user_id)?;
        if points.points < amount {
            return Err(PointsError::Insufficient {
                balance: points.points,
                requested: amount,
            });
        }

        points.points -= amount;
        points.updated_at = now_millis();
        self.put_points_txn(&txn, &points)?;
        self.append_txn(
            &txn,
            &PointsTransaction {
                user_id,
                amount: -amount,
                kind: PointsKind::Spend,
                description: description.to_string(),
                created_at: now_millis(),
            },
        )?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(user_id, amount, "Loyalty points spent");
        Ok(points)
    }

    /// Balance plus history, newest entry first
    pub fn get(&self, user_id: u64) -> StoreResult<PointsSummary> {
        let read = self.store.db().begin_read()?;

        let points = {
            let table = read.open_table(POINTS_TABLE)?;
            match table.get(user_id)? {
                Some(value) => serde_json::from_slice::<UserPoints>(value.value())?.points,
                None => 0,
            }
        };

        let mut transactions = Vec::new();
        {
            let table = read.open_table(POINTS_TXNS_TABLE)?;
            for result in table.range((user_id, 0u64)..=(user_id, u64::MAX))? {
                let (_key, value) = result?;
                transactions.push(serde_json::from_slice(value.value())?);
            }
        }
        transactions.reverse();

        Ok(PointsSummary {
            user_id,
            points,
            transactions,
        })
    }
}

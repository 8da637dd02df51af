//! Vendor wallet ledger
//!
//! Two balance buckets per vendor (pending, available) backed by an
//! append-only transaction log. Only the fulfillment engine mutates
//! wallets: `credit_pending` on payment, `settle` on delivery
//! confirmation. Both mutations run inside the caller's write
//! transaction so a checkout that fails later leaves no orphaned credit,
//! and concurrent settlements on the same wallet cannot lose updates.

use redb::{ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::models::wallet::{
    TxnKind, TxnStatus, VendorWallet, WalletSummary, WalletTransaction,
};
use shared::util::now_millis;

use crate::orders::money::{add, sub_floor_zero};
use crate::storage::{MarketStore, StoreResult};

pub(crate) const WALLETS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("wallets");
pub(crate) const WALLET_TXNS_TABLE: TableDefinition<(u64, u64), &[u8]> =
    TableDefinition::new("wallet_txns");

/// Ledger over the wallet tables
#[derive(Clone, Debug)]
pub struct WalletLedger {
    store: MarketStore,
}

impl WalletLedger {
    pub fn new(store: MarketStore) -> Self {
        Self { store }
    }

    fn get_or_create_txn(
        &self,
        txn: &WriteTransaction,
        vendor_id: u64,
    ) -> StoreResult<VendorWallet> {
        let table = txn.open_table(WALLETS_TABLE)?;
        match table.get(vendor_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(VendorWallet::empty(vendor_id, now_millis())),
        }
    }

    fn put_wallet_txn(&self, txn: &WriteTransaction, wallet: &VendorWallet) -> StoreResult<()> {
        let mut table = txn.open_table(WALLETS_TABLE)?;
        table.insert(wallet.vendor_id, serde_json::to_vec(wallet)?.as_slice())?;
        Ok(())
    }

    fn append_txn(
        &self,
        txn: &WriteTransaction,
        record: &WalletTransaction,
    ) -> StoreResult<()> {
        let seq = self.store.next_id(txn, "wallet_txn")?;
        let mut table = txn.open_table(WALLET_TXNS_TABLE)?;
        table.insert(
            (record.vendor_id, seq),
            serde_json::to_vec(record)?.as_slice(),
        )?;
        Ok(())
    }

    /// Credit a vendor's pending balance for a freshly paid order
    ///
    /// Get-or-creates the wallet (zero-initialized), adds `amount` to the
    /// pending bucket and appends a `credit/pending` record tagged with
    /// the order id.
    pub fn credit_pending(
        &self,
        txn: &WriteTransaction,
        vendor_id: u64,
        order_id: u64,
        amount: f64,
    ) -> StoreResult<()> {
        let mut wallet = self.get_or_create_txn(txn, vendor_id)?;
        wallet.pending_balance = add(wallet.pending_balance, amount);
        wallet.updated_at = now_millis();
        self.put_wallet_txn(txn, &wallet)?;

        self.append_txn(
            txn,
            &WalletTransaction {
                vendor_id,
                amount,
                kind: TxnKind::Credit,
                status: TxnStatus::Pending,
                order_id,
                description: format!("Pending earnings for order #{}", order_id),
                created_at: now_millis(),
            },
        )?;

        tracing::info!(vendor_id, order_id, amount, "Wallet pending credit");
        Ok(())
    }

    /// Release an order's pending funds after delivery confirmation
    ///
    /// Moves `amount` from the pending bucket (floored at zero) into the
    /// available bucket and flips the matching pending credit record(s)
    /// for that order to `completed`.
    pub fn settle(
        &self,
        txn: &WriteTransaction,
        vendor_id: u64,
        order_id: u64,
        amount: f64,
    ) -> StoreResult<()> {
        let mut wallet = self.get_or_create_txn(txn, vendor_id)?;
        wallet.pending_balance = sub_floor_zero(wallet.pending_balance, amount);
        wallet.available_balance = add(wallet.available_balance, amount);
        wallet.updated_at = now_millis();
        self.put_wallet_txn(txn, &wallet)?;

        // Flip matching pending credits to completed
        let mut table = txn.open_table(WALLET_TXNS_TABLE)?;
        let mut updates: Vec<((u64, u64), WalletTransaction)> = Vec::new();
        for result in table.range((vendor_id, 0u64)..=(vendor_id, u64::MAX))? {
            let (key, value) = result?;
            let record: WalletTransaction = serde_json::from_slice(value.value())?;
            if record.order_id == order_id
                && record.kind == TxnKind::Credit
                && record.status == TxnStatus::Pending
            {
                updates.push((key.value(), record));
            }
        }
        for (key, mut record) in updates {
            record.status = TxnStatus::Completed;
            table.insert(key, serde_json::to_vec(&record)?.as_slice())?;
        }

        tracing::info!(vendor_id, order_id, amount, "Wallet settled to available");
        Ok(())
    }

    /// Wallet plus its transaction log, newest transaction first
    pub fn get(&self, vendor_id: u64) -> StoreResult<WalletSummary> {
        let read = self.store.db().begin_read()?;

        let wallet = {
            let table = read.open_table(WALLETS_TABLE)?;
            match table.get(vendor_id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => VendorWallet::empty(vendor_id, now_millis()),
            }
        };

        let mut transactions = Vec::new();
        {
            let table = read.open_table(WALLET_TXNS_TABLE)?;
            for result in table.range((vendor_id, 0u64)..=(vendor_id, u64::MAX))? {
                let (_key, value) = result?;
                transactions.push(serde_json::from_slice(value.value())?);
            }
        }
        transactions.reverse();

        Ok(WalletSummary {
            vendor_id,
            available_balance: wallet.available_balance,
            pending_balance: wallet.pending_balance,
            transactions,
        })
    }
}

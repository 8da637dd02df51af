//! Server state
//!
//! `ServerState` holds shared references to every service. `Arc` makes
//! clones cheap; axum clones the state per request.

use std::sync::Arc;

use crate::core::Config;
use crate::notify::StoreNotifier;
use crate::orders::FulfillmentEngine;
use crate::storage::MarketStore;

/// Shared server state
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | Immutable configuration |
/// | store | Embedded redb storage |
/// | engine | Fulfillment engine (checkout, status, ledgers) |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub store: MarketStore,
    pub engine: Arc<FulfillmentEngine>,
}

impl ServerState {
    /// Initialize state: work directory, database, engine
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let store = MarketStore::open(config.database_path())?;
        let notifier = Arc::new(StoreNotifier::new(store.clone()));
        let engine = Arc::new(FulfillmentEngine::new(
            store.clone(),
            notifier,
            config.gateway_delay_ms,
            config.points_per_currency,
        ));

        tracing::info!(
            db = %config.database_path().display(),
            "Market store opened"
        );

        Ok(Self {
            config: config.clone(),
            store,
            engine,
        })
    }

    /// In-memory state for tests and ephemeral runs
    pub fn in_memory(config: &Config) -> anyhow::Result<Self> {
        let store = MarketStore::open_in_memory()?;
        let notifier = Arc::new(StoreNotifier::new(store.clone()));
        let engine = Arc::new(FulfillmentEngine::new(
            store.clone(),
            notifier,
            config.gateway_delay_ms,
            config.points_per_currency,
        ));

        Ok(Self {
            config: config.clone(),
            store,
            engine,
        })
    }
}

//! Emission node: a [`Distributor`] backed by the persistent quota store.

use std::sync::Arc;

use tracing::info;

use ember_core::error::EmissionError;
use ember_core::traits::{GovernancePolicy, TokenMinter};
use ember_core::types::{Address, PoolKey, QuotaRecord};
use ember_emission::Distributor;

use crate::config::NodeConfig;
use crate::storage::RocksQuotaStore;

/// Distributor plus the RocksDB store its density lives in.
pub struct EmissionNode {
    config: NodeConfig,
    store: Arc<RocksQuotaStore>,
    distributor: Distributor,
}

impl EmissionNode {
    /// Open the store under `config.db_path()` and build the distributor.
    ///
    /// Density recorded by a previous run is picked up as-is.
    pub fn open(
        config: NodeConfig,
        holding: Address,
        governance: Arc<dyn GovernancePolicy>,
        minter: Arc<dyn TokenMinter>,
    ) -> Result<Self, EmissionError> {
        let params = config.emission.to_params()?;
        std::fs::create_dir_all(&config.data_dir)
            .map_err(|e| EmissionError::Storage(e.to_string()))?;

        let store = Arc::new(RocksQuotaStore::open(config.db_path())?);
        let distributor = Distributor::new(holding, params, governance, minter, store.clone())?;

        info!(
            data_dir = %config.data_dir.display(),
            %holding,
            pools = store.pools()?.len(),
            "emission node opened"
        );

        Ok(Self {
            config,
            store,
            distributor,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn distributor(&self) -> &Distributor {
        &self.distributor
    }

    pub fn store(&self) -> &RocksQuotaStore {
        &self.store
    }

    /// Persisted density of every pool seen so far.
    pub fn densities(&self) -> Result<Vec<(PoolKey, QuotaRecord)>, EmissionError> {
        self.store.pools()
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), EmissionError> {
        self.store.flush()
    }
}

//! Shared test doubles for end-to-end and property tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;

use ember_core::constants::TOKEN;
use ember_core::error::{EmissionError, MintError, RegistryError};
use ember_core::params::RateParameters;
use ember_core::traits::{PoolRegistry, SingleGovernor, TokenMinter};
use ember_core::types::{Address, Allocation, Amount, Distribution, PoolKey};
use ember_emission::{Distributor, MemoryQuotaStore};

/// Deterministic address from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address::from_bytes([seed; 20])
}

pub const GOVERNOR: u8 = 0x01;
pub const HOLDING: u8 = 0x02;
pub const ROUTER: u8 = 0x03;
pub const POOL: u8 = 0x10;
pub const USER: u8 = 0x20;

/// Balanced reference reserves: quota 500 tokens at the neutral tier.
pub const RESERVE: Amount = 10_000 * TOKEN;

/// Reward token with its own minter allow-list and balances.
#[derive(Default)]
pub struct MemoryToken {
    minters: RwLock<BTreeSet<Address>>,
    balances: RwLock<HashMap<Address, Amount>>,
    paused: RwLock<bool>,
}

impl MemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_minter(&self, account: Address) {
        self.minters.write().insert(account);
    }

    pub fn remove_minter(&self, account: &Address) {
        self.minters.write().remove(account);
    }

    /// While paused every mint is rejected.
    pub fn set_paused(&self, paused: bool) {
        *self.paused.write() = paused;
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.read().get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.balances.read().values().sum()
    }
}

impl TokenMinter for MemoryToken {
    fn is_minter(&self, account: &Address) -> bool {
        self.minters.read().contains(account)
    }

    fn mint(&self, minter: &Address, allocations: &[Allocation]) -> Result<(), MintError> {
        if !self.is_minter(minter) {
            return Err(MintError::NotMinter(*minter));
        }
        if *self.paused.read() {
            return Err(MintError::Rejected("token paused".into()));
        }

        let mut balances = self.balances.write();
        let mut updated = balances.clone();
        for allocation in allocations {
            let entry = updated.entry(allocation.to).or_insert(0);
            *entry = entry
                .checked_add(allocation.amount)
                .ok_or_else(|| MintError::Rejected("balance overflow".into()))?;
        }
        *balances = updated;
        Ok(())
    }
}

/// Pool registry with fixed per-pool state.
pub struct StaticPoolRegistry {
    pools: RwLock<HashMap<PoolKey, (Amount, Amount)>>,
    pool_count: u64,
}

impl StaticPoolRegistry {
    pub fn new(pool_count: u64) -> Self {
        Self {
            pools: RwLock::new(HashMap::new()),
            pool_count,
        }
    }

    /// Register `pool` with a reward rate and share supply.
    pub fn with_pool(self, pool: PoolKey, reward_rate: Amount, supply: Amount) -> Self {
        self.pools.write().insert(pool, (reward_rate, supply));
        self
    }

    fn state(&self, pool: &PoolKey) -> Result<(Amount, Amount), RegistryError> {
        self.pools
            .read()
            .get(pool)
            .copied()
            .ok_or(RegistryError::UnknownPool(*pool))
    }
}

impl PoolRegistry for StaticPoolRegistry {
    fn pool_reward_rate(&self, pool: &PoolKey) -> Result<Amount, RegistryError> {
        Ok(self.state(pool)?.0)
    }

    fn pool_supply(&self, pool: &PoolKey) -> Result<Amount, RegistryError> {
        Ok(self.state(pool)?.1)
    }

    fn pool_count(&self) -> Result<u64, RegistryError> {
        Ok(self.pool_count)
    }
}

/// A distributor over an in-memory store, plus handles to its collaborators.
pub struct Harness {
    pub distributor: Distributor,
    pub token: Arc<MemoryToken>,
    pub store: Arc<MemoryQuotaStore>,
}

impl Harness {
    /// Fresh, unwired distributor: no registry, no minter rights, no routers.
    pub fn new(params: RateParameters) -> Self {
        let token = Arc::new(MemoryToken::new());
        let store = Arc::new(MemoryQuotaStore::new());
        let distributor = Distributor::new(
            addr(HOLDING),
            params,
            Arc::new(SingleGovernor(addr(GOVERNOR))),
            token.clone(),
            store.clone(),
        )
        .unwrap();
        Self {
            distributor,
            token,
            store,
        }
    }

    /// Distributor ready to pay out: an empty pool at [`POOL`] (so the rate
    /// sits at the ceiling), minter rights granted and [`ROUTER`] allowed.
    pub fn wired() -> Self {
        let harness = Self::new(RateParameters::default());
        harness.wire(StaticPoolRegistry::new(1).with_pool(addr(POOL), 10 * TOKEN, 0));
        harness
    }

    pub fn wire(&self, registry: StaticPoolRegistry) {
        let governor = addr(GOVERNOR);
        self.distributor
            .set_pool_registry(&governor, Arc::new(registry))
            .unwrap();
        self.token.add_minter(addr(HOLDING));
        self.distributor.allow(&governor, addr(ROUTER)).unwrap();
    }

    /// Reward event from the allowed router at balanced reference reserves.
    pub fn reward(&self, fee: Amount) -> Result<Distribution, EmissionError> {
        self.distributor.distribute(
            &addr(ROUTER),
            &addr(POOL),
            fee,
            RESERVE,
            RESERVE,
            TOKEN,
            addr(USER),
        )
    }
}

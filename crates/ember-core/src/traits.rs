//! Trait interfaces for the Ember emission engine.
//!
//! These traits define the seams between the numeric core and its
//! collaborators:
//! - [`QuotaStore`]: persistent per-pool density (in-memory or RocksDB)
//! - [`TokenMinter`]: reward-token minting capability
//! - [`PoolRegistry`]: authoritative reward-pool state
//! - [`GovernancePolicy`]: who may mutate the router allow-list

use crate::error::{EmissionError, MintError, RegistryError};
use crate::types::{Address, Allocation, Amount, PoolKey, QuotaRecord};

/// Key-value storage of per-pool quota records.
///
/// Records are never deleted. Implementations must return a zeroed record
/// for pools that were never written.
pub trait QuotaStore: Send + Sync {
    /// Load the record of `pool`, or the default record if absent.
    fn get(&self, pool: &PoolKey) -> Result<QuotaRecord, EmissionError>;

    /// Replace the record of `pool`.
    fn put(&self, pool: &PoolKey, record: &QuotaRecord) -> Result<(), EmissionError>;
}

/// Reward-token minting capability.
///
/// The token keeps its own minter allow-list; the engine must be registered
/// on it before any distribution succeeds.
pub trait TokenMinter: Send + Sync {
    /// Whether `account` is on the token's minter allow-list.
    fn is_minter(&self, account: &Address) -> bool;

    /// Mint every allocation on behalf of `minter`.
    ///
    /// All-or-nothing: on error no allocation is credited.
    fn mint(&self, minter: &Address, allocations: &[Allocation]) -> Result<(), MintError>;
}

/// Read access to the reward-pool (vault) collaborator.
pub trait PoolRegistry: Send + Sync {
    /// Current reward rate of the staking pool backing `pool`.
    fn pool_reward_rate(&self, pool: &PoolKey) -> Result<Amount, RegistryError>;

    /// Total supply of the pool's share token.
    fn pool_supply(&self, pool: &PoolKey) -> Result<Amount, RegistryError>;

    /// Number of staking pools sharing the reward budget. May be zero.
    fn pool_count(&self) -> Result<u64, RegistryError>;
}

/// Authorization policy for privileged (governance) operations.
pub trait GovernancePolicy: Send + Sync {
    fn is_governance(&self, caller: &Address) -> bool;
}

/// A policy with exactly one privileged identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleGovernor(pub Address);

impl GovernancePolicy for SingleGovernor {
    fn is_governance(&self, caller: &Address) -> bool {
        *caller == self.0
    }
}

//! Per-pool emission quota and cumulative density.
//!
//! Density is the running total of *requested* emission for a pool. The
//! quota is recomputed on every call from the reserves supplied with it:
//!
//! `quota = (x + y) * quota_ratio / RATE_BASE * tier / TIER_BASE`
//!
//! and is never persisted. [`QuotaTracker`] is the only writer of density.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use ember_core::constants::{RATE_BASE, TIER_BASE};
use ember_core::error::EmissionError;
use ember_core::math::{narrow_saturating, product, widen};
use ember_core::params::RateParameters;
use ember_core::traits::QuotaStore;
use ember_core::types::{Amount, PoolKey, QuotaRecord, Tier};

/// Reads and advances per-pool density on top of a [`QuotaStore`].
pub struct QuotaTracker {
    store: Arc<dyn QuotaStore>,
    quota_ratio: u128,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn QuotaStore>, params: &RateParameters) -> Self {
        Self {
            store,
            quota_ratio: params.quota_ratio,
        }
    }

    /// Current cumulative density of `pool` (zero for unseen pools).
    pub fn density(&self, pool: &PoolKey) -> Result<Amount, EmissionError> {
        Ok(self.store.get(pool)?.cumulative_density)
    }

    /// Tier-scaled quota for reserves `(x, y)`.
    ///
    /// Saturates at `u128::MAX`; zero reserves yield a zero quota.
    pub fn quota(&self, x: Amount, y: Amount, tier: Tier) -> Result<Amount, EmissionError> {
        let reserves = widen(x) + widen(y);
        let scaled = reserves
            .checked_mul(product(&[self.quota_ratio, tier.multiplier() as u128])?)
            .ok_or(EmissionError::ArithmeticOverflow)?;
        let quota = scaled / product(&[RATE_BASE, TIER_BASE as u128])?;
        Ok(narrow_saturating(quota))
    }

    /// Density `pool` would reach after requesting `std_amount`.
    pub fn density_after(
        &self,
        pool: &PoolKey,
        std_amount: Amount,
    ) -> Result<Amount, EmissionError> {
        self.density(pool)?
            .checked_add(std_amount)
            .ok_or(EmissionError::ArithmeticOverflow)
    }

    /// Add `std_amount` to the density of `pool` and return the new density.
    ///
    /// Callers serialize writes per pool.
    pub(crate) fn record(&self, pool: &PoolKey, std_amount: Amount) -> Result<Amount, EmissionError> {
        let density = self.density_after(pool, std_amount)?;
        self.store.put(
            pool,
            &QuotaRecord {
                cumulative_density: density,
            },
        )?;
        debug!(%pool, std_amount, density, "density advanced");
        Ok(density)
    }

    /// Overwrite the record of `pool`. Used to undo a [`record`](Self::record)
    /// whose distribution failed afterwards.
    pub(crate) fn restore(&self, pool: &PoolKey, record: QuotaRecord) -> Result<(), EmissionError> {
        self.store.put(pool, &record)
    }

    pub(crate) fn snapshot(&self, pool: &PoolKey) -> Result<QuotaRecord, EmissionError> {
        self.store.get(pool)
    }
}

/// In-memory [`QuotaStore`].
#[derive(Default)]
pub struct MemoryQuotaStore {
    records: RwLock<HashMap<PoolKey, QuotaRecord>>,
}

impl MemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pools with a stored record.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl QuotaStore for MemoryQuotaStore {
    fn get(&self, pool: &PoolKey) -> Result<QuotaRecord, EmissionError> {
        Ok(self.records.read().get(pool).copied().unwrap_or_default())
    }

    fn put(&self, pool: &PoolKey, record: &QuotaRecord) -> Result<(), EmissionError> {
        self.records.write().insert(*pool, *record);
        Ok(())
    }
}

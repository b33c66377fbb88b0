//! Decay engine: baseline rate, turnover tier and quota pressure combined
//! into the amount a single reward event may mint.
//!
//! For a reward event with fee `f`:
//! 1. `std = rate * f / fee_unit`, the undecayed amount.
//! 2. `D = density + std`, `L = quota(x, y, tier)`.
//! 3. `actual = std` while `D <= L`, otherwise
//!    `actual = std * L * (2D - L) / D²  =  std * (1 - ((D - L) / D)²)`.
//! 4. Density advances by `std`, not `actual`, so splitting one call into
//!    many smaller ones builds the same pressure.
//!
//! The curve is continuous at `D = L` and strictly decreasing in `D` beyond
//! it. All arithmetic is integer-only with 512-bit intermediates.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use ember_core::error::EmissionError;
use ember_core::math::{mul_div, narrow, widen};
use ember_core::params::RateParameters;
use ember_core::traits::{PoolRegistry, QuotaStore};
use ember_core::types::{Amount, EmissionQuote, PoolKey, Tier};

use crate::quota::QuotaTracker;
use crate::rate::RateCalculator;
use crate::turnover::TurnoverClassifier;

/// Payout after quota pressure for a request of `std_amount` that brings the
/// pool to `density` against `quota`.
pub fn decayed_amount(
    std_amount: Amount,
    density: Amount,
    quota: Amount,
) -> Result<Amount, EmissionError> {
    if density <= quota {
        return Ok(std_amount);
    }

    // density > quota >= 0, so the divisor is non-zero.
    let d = widen(density);
    let l = widen(quota);
    let weight = l * (d * widen(2) - l);
    let scaled = widen(std_amount)
        .checked_mul(weight)
        .ok_or(EmissionError::ArithmeticOverflow)?;
    narrow(scaled / (d * d))
}

/// The production emission calculator.
pub struct DecayEngine {
    rate: RateCalculator,
    turnover: TurnoverClassifier,
    quota: QuotaTracker,
    fee_unit: Amount,
    registry: RwLock<Option<Arc<dyn PoolRegistry>>>,
    /// One lock per pool key ever seen. Pool records are never deleted, so
    /// this grows with the number of pools and is not pruned.
    pool_locks: DashMap<PoolKey, Arc<Mutex<()>>>,
}

impl DecayEngine {
    /// Create an engine over `store`. The pool registry starts unset.
    pub fn new(params: &RateParameters, store: Arc<dyn QuotaStore>) -> Self {
        Self {
            rate: RateCalculator::new(params),
            turnover: TurnoverClassifier::new(params),
            quota: QuotaTracker::new(store, params),
            fee_unit: params.fee_unit,
            registry: RwLock::new(None),
            pool_locks: DashMap::new(),
        }
    }

    /// Wire the pool registry collaborator, replacing any previous one.
    ///
    /// Governance-gated through [`Distributor::set_pool_registry`](crate::Distributor::set_pool_registry).
    pub(crate) fn set_pool_registry(&self, registry: Arc<dyn PoolRegistry>) {
        *self.registry.write() = Some(registry);
        info!("pool registry configured");
    }

    pub fn has_pool_registry(&self) -> bool {
        self.registry.read().is_some()
    }

    fn registry(&self) -> Result<Arc<dyn PoolRegistry>, EmissionError> {
        self.registry
            .read()
            .clone()
            .ok_or(EmissionError::UpstreamNotConfigured)
    }

    pub fn rate_calculator(&self) -> &RateCalculator {
        &self.rate
    }

    pub fn classifier(&self) -> &TurnoverClassifier {
        &self.turnover
    }

    pub fn quota_tracker(&self) -> &QuotaTracker {
        &self.quota
    }

    /// Lock serializing density writers of `pool`.
    pub(crate) fn pool_lock(&self, pool: &PoolKey) -> Arc<Mutex<()>> {
        self.pool_locks.entry(*pool).or_default().clone()
    }

    /// Baseline rate of `pool` at NAV `nav_per_share`, from registry data.
    pub fn current_rate(
        &self,
        pool: &PoolKey,
        nav_per_share: Amount,
    ) -> Result<Amount, EmissionError> {
        let registry = self.registry()?;
        let reward_rate = registry.pool_reward_rate(pool)?;
        let supply = registry.pool_supply(pool)?;
        let pool_count = registry.pool_count()?;
        self.rate
            .baseline_rate(reward_rate, supply, nav_per_share, pool_count)
    }

    /// Undecayed amount for `fee` at `rate`.
    pub fn std_amount(&self, rate: Amount, fee: Amount) -> Result<Amount, EmissionError> {
        mul_div(rate, fee, self.fee_unit)
    }

    /// `(rate, std_amount)` for a fee on `pool`.
    pub fn std_rate_and_amount(
        &self,
        pool: &PoolKey,
        nav_per_share: Amount,
        fee: Amount,
    ) -> Result<(Amount, Amount), EmissionError> {
        let rate = self.current_rate(pool, nav_per_share)?;
        Ok((rate, self.std_amount(rate, fee)?))
    }

    /// Density `pool` would reach after requesting `std_amount`.
    pub fn density_after(
        &self,
        pool: &PoolKey,
        std_amount: Amount,
    ) -> Result<Amount, EmissionError> {
        self.quota.density_after(pool, std_amount)
    }

    pub fn tier(&self, x: Amount, y: Amount) -> Tier {
        self.turnover.tier(x, y)
    }

    /// Preview a reward event against the current persisted density.
    ///
    /// Pure: nothing is written. A committed event on the same state yields
    /// the same quote.
    pub fn quote(
        &self,
        pool: &PoolKey,
        fee: Amount,
        x: Amount,
        y: Amount,
        nav_per_share: Amount,
    ) -> Result<EmissionQuote, EmissionError> {
        let (rate, std_amount) = self.std_rate_and_amount(pool, nav_per_share, fee)?;
        let tier = self.turnover.tier(x, y);
        let quota = self.quota.quota(x, y, tier)?;
        let density = self.quota.density_after(pool, std_amount)?;
        let actual_amount = decayed_amount(std_amount, density, quota)?;

        if actual_amount < std_amount {
            debug!(%pool, %tier, std_amount, actual_amount, density, quota, "quota pressure");
        }

        Ok(EmissionQuote {
            rate,
            std_amount,
            actual_amount,
            tier,
            quota,
            density,
        })
    }

    /// Advance the density of `pool` by `std_amount`.
    pub(crate) fn commit(&self, pool: &PoolKey, std_amount: Amount) -> Result<Amount, EmissionError> {
        self.quota.record(pool, std_amount)
    }
}

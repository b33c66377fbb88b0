//! Reward distribution: the only entry point that touches token balances.
//!
//! A distribution runs entirely under the pool's lock:
//! 1. the caller must be an allowed router and the engine a registered minter;
//! 2. the event is quoted against the persisted density;
//! 3. density advances by the requested amount;
//! 4. the minted amount is split between recipient and holding address and
//!    minted in one all-or-nothing call.
//!
//! If minting fails the density is rewound, so a failed call commits nothing.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use ember_core::constants::PERCENT_BASE;
use ember_core::error::EmissionError;
use ember_core::math::mul_div;
use ember_core::params::RateParameters;
use ember_core::traits::{GovernancePolicy, PoolRegistry, QuotaStore, TokenMinter};
use ember_core::types::{
    Address, Allocation, Amount, Distribution, EmissionEvent, EmissionQuote, PoolKey,
};

use crate::access::AccessRegistry;
use crate::engine::DecayEngine;

/// Capacity of the event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Orchestrates reward events for allow-listed routers.
pub struct Distributor {
    /// The engine's own account: minter identity and holder of the retained share.
    holding: Address,
    access: AccessRegistry,
    engine: DecayEngine,
    minter: Arc<dyn TokenMinter>,
    retention_percent: u64,
    events: broadcast::Sender<EmissionEvent>,
}

impl Distributor {
    /// Build a distributor. Fails with [`EmissionError::Config`] on invalid
    /// parameters.
    pub fn new(
        holding: Address,
        params: RateParameters,
        governance: Arc<dyn GovernancePolicy>,
        minter: Arc<dyn TokenMinter>,
        store: Arc<dyn QuotaStore>,
    ) -> Result<Self, EmissionError> {
        params.validate()?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            holding,
            access: AccessRegistry::new(governance),
            engine: DecayEngine::new(&params, store),
            minter,
            retention_percent: params.retention_percent,
            events,
        })
    }

    /// The engine's holding address.
    pub fn holding(&self) -> Address {
        self.holding
    }

    /// Read-only previews (rate, tier, density, quote).
    ///
    /// ```no_run
    /// # use ember_core::types::PoolKey;
    /// # use ember_emission::Distributor;
    /// fn density(d: &Distributor, pool: &PoolKey) -> u128 {
    ///     d.engine().quota_tracker().density(pool).unwrap_or(0)
    /// }
    /// ```
    ///
    /// Registry wiring and density writes are not reachable from here; they
    /// go through the governance and router checks of the distributor.
    ///
    /// ```compile_fail
    /// # use std::sync::Arc;
    /// # use ember_core::traits::PoolRegistry;
    /// # use ember_emission::Distributor;
    /// fn rewire(d: &Distributor, registry: Arc<dyn PoolRegistry>) {
    ///     d.engine().set_pool_registry(registry);
    /// }
    /// ```
    ///
    /// ```compile_fail
    /// # use ember_core::types::PoolKey;
    /// # use ember_emission::Distributor;
    /// fn burn(d: &Distributor, pool: &PoolKey) {
    ///     d.engine().quota_tracker().record(pool, u128::MAX).unwrap();
    /// }
    /// ```
    pub fn engine(&self) -> &DecayEngine {
        &self.engine
    }

    /// Subscribe to change-of-state notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<EmissionEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: EmissionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    // --- governance ---

    pub fn allow(&self, caller: &Address, router: Address) -> Result<(), EmissionError> {
        self.access.allow(caller, router)?;
        self.publish(EmissionEvent::RouterAllowed(router));
        Ok(())
    }

    pub fn disallow(&self, caller: &Address, router: Address) -> Result<(), EmissionError> {
        self.access.disallow(caller, router)?;
        self.publish(EmissionEvent::RouterDisallowed(router));
        Ok(())
    }

    pub fn is_allowed(&self, router: &Address) -> bool {
        self.access.is_allowed(router)
    }

    pub fn routers(&self) -> Vec<Address> {
        self.access.routers()
    }

    /// Wire the pool registry. Governance only.
    pub fn set_pool_registry(
        &self,
        caller: &Address,
        registry: Arc<dyn PoolRegistry>,
    ) -> Result<(), EmissionError> {
        self.access.ensure_governance(caller)?;
        self.engine.set_pool_registry(registry);
        self.publish(EmissionEvent::PoolRegistrySet);
        Ok(())
    }

    // --- distribution ---

    /// Split `actual` into `(to_recipient, retained)`.
    pub fn split(&self, actual: Amount) -> Result<(Amount, Amount), EmissionError> {
        let to_recipient = mul_div(
            actual,
            self.retention_percent as u128,
            PERCENT_BASE as u128,
        )?;
        Ok((to_recipient, actual - to_recipient))
    }

    /// Preview of [`distribute`](Self::distribute) without authorization or
    /// side effects.
    pub fn quote(
        &self,
        pool: &PoolKey,
        fee: Amount,
        x: Amount,
        y: Amount,
        nav_per_share: Amount,
    ) -> Result<EmissionQuote, EmissionError> {
        self.engine.quote(pool, fee, x, y, nav_per_share)
    }

    /// Run one reward event on behalf of router `caller`.
    #[allow(clippy::too_many_arguments)]
    pub fn distribute(
        &self,
        caller: &Address,
        pool: &PoolKey,
        fee: Amount,
        x: Amount,
        y: Amount,
        nav_per_share: Amount,
        recipient: Address,
    ) -> Result<Distribution, EmissionError> {
        if !self.access.is_allowed(caller) {
            return Err(EmissionError::Unauthorized(*caller));
        }
        if !self.minter.is_minter(&self.holding) {
            warn!(holding = %self.holding, "engine is not a registered minter");
            return Err(EmissionError::MinterNotAuthorized(self.holding));
        }

        let lock = self.engine.pool_lock(pool);
        let _guard = lock.lock();

        let quote = self.engine.quote(pool, fee, x, y, nav_per_share)?;
        let (to_recipient, retained) = self.split(quote.actual_amount)?;

        let before = self.engine.quota_tracker().snapshot(pool)?;
        let density = self.engine.commit(pool, quote.std_amount)?;

        let allocations: Vec<Allocation> = [
            Allocation { to: recipient, amount: to_recipient },
            Allocation { to: self.holding, amount: retained },
        ]
        .into_iter()
        .filter(|a| a.amount > 0)
        .collect();

        if !allocations.is_empty() {
            if let Err(err) = self.minter.mint(&self.holding, &allocations) {
                warn!(%pool, error = %err, "mint failed, rewinding density");
                self.engine.quota_tracker().restore(pool, before)?;
                return Err(err.into());
            }
        }

        let distribution = Distribution {
            pool: *pool,
            fee,
            recipient,
            std_amount: quote.std_amount,
            actual_amount: quote.actual_amount,
            to_recipient,
            retained,
            tier: quote.tier,
            density,
        };
        info!(
            %pool,
            %recipient,
            fee,
            actual_amount = distribution.actual_amount,
            to_recipient,
            tier = %distribution.tier,
            "reward distributed"
        );
        self.publish(EmissionEvent::Distributed(distribution));
        Ok(distribution)
    }
}

//! Router allow-list gated by the governance policy.
//!
//! Only allow-listed routers may trigger a distribution. The list is
//! mutated exclusively by governance and both mutations are strict:
//! allowing a present router or disallowing an absent one is an error, so
//! operator mistakes surface instead of silently succeeding.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use ember_core::error::EmissionError;
use ember_core::traits::GovernancePolicy;
use ember_core::types::Address;

/// Governance-managed set of allowed routers.
pub struct AccessRegistry {
    governance: Arc<dyn GovernancePolicy>,
    routers: RwLock<BTreeSet<Address>>,
}

impl AccessRegistry {
    pub fn new(governance: Arc<dyn GovernancePolicy>) -> Self {
        Self {
            governance,
            routers: RwLock::new(BTreeSet::new()),
        }
    }

    /// Fail with [`EmissionError::Unauthorized`] unless `caller` is governance.
    pub fn ensure_governance(&self, caller: &Address) -> Result<(), EmissionError> {
        if self.governance.is_governance(caller) {
            Ok(())
        } else {
            Err(EmissionError::Unauthorized(*caller))
        }
    }

    /// Add `router` to the allow-list.
    pub fn allow(&self, caller: &Address, router: Address) -> Result<(), EmissionError> {
        self.ensure_governance(caller)?;
        if !self.routers.write().insert(router) {
            return Err(EmissionError::AlreadyAllowed(router));
        }
        info!(%router, "router allowed");
        Ok(())
    }

    /// Remove `router` from the allow-list.
    pub fn disallow(&self, caller: &Address, router: Address) -> Result<(), EmissionError> {
        self.ensure_governance(caller)?;
        if !self.routers.write().remove(&router) {
            return Err(EmissionError::NotAllowed(router));
        }
        info!(%router, "router disallowed");
        Ok(())
    }

    pub fn is_allowed(&self, router: &Address) -> bool {
        self.routers.read().contains(router)
    }

    /// Snapshot of allowed routers in address order.
    pub fn routers(&self) -> Vec<Address> {
        self.routers.read().iter().copied().collect()
    }
}

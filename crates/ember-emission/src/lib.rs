//! # ember-emission: Decay-curve emission and distribution engine.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! One reward event flows through:
//! - **Access control**: only allow-listed routers may trigger emission
//!   ([`AccessRegistry`]).
//! - **Baseline rate**: reward-pool rate over supply, NAV and pool count,
//!   clamped to a protocol ceiling ([`RateCalculator`]).
//! - **Turnover tier**: a five-band step multiplier over the `y / x`
//!   imbalance of the pool ([`TurnoverClassifier`]).
//! - **Quota pressure**: cumulative density per pool against a tier-scaled,
//!   reserve-derived quota, with a quadratic payout decay once the quota is
//!   exceeded ([`QuotaTracker`], [`DecayEngine`]).
//! - **Distribution**: mint, recipient/reserve split and density commit under
//!   a per-pool lock ([`Distributor`]).

pub mod access;
pub mod distributor;
pub mod engine;
pub mod quota;
pub mod rate;
pub mod turnover;

pub use access::AccessRegistry;
pub use distributor::Distributor;
pub use engine::DecayEngine;
pub use quota::{MemoryQuotaStore, QuotaTracker};
pub use rate::RateCalculator;
pub use turnover::TurnoverClassifier;

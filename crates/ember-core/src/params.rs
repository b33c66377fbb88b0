//! Process-wide emission parameters.
//!
//! [`RateParameters`] is fixed when the engine is constructed and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_QUOTA_RATIO, DEFAULT_RATE_CEILING, DEFAULT_RETENTION_PERCENT,
    DEFAULT_TIER_BREAKPOINTS, DEFAULT_YIELD_MULTIPLIER, FEE_UNIT, PERCENT_BASE,
};
use crate::error::EmissionError;

/// A non-negative rational `num / den`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ratio {
    pub num: u64,
    pub den: u64,
}

impl Ratio {
    pub const fn new(num: u64, den: u64) -> Self {
        Self { num, den }
    }

    /// Strict ordering by cross-multiplication (no rounding).
    pub fn lt(&self, other: &Ratio) -> bool {
        (self.num as u128) * (other.den as u128) < (other.num as u128) * (self.den as u128)
    }
}

/// Immutable configuration of the emission pipeline.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RateParameters {
    /// Upper bound of the baseline rate.
    pub default_rate_ceiling: u128,
    /// Numerator constant of the baseline rate formula.
    pub yield_multiplier: u128,
    /// Fee normalization base.
    pub fee_unit: u128,
    /// Percent of each minted amount credited to the recipient.
    pub retention_percent: u64,
    /// Reserve share granted as quota at a 1.0× tier, scaled by `RATE_BASE`.
    pub quota_ratio: u128,
    /// Inclusive upper bounds of the four lower turnover bands.
    pub tier_breakpoints: [Ratio; 4],
}

impl Default for RateParameters {
    fn default() -> Self {
        let [a, b, c, d] = DEFAULT_TIER_BREAKPOINTS;
        Self {
            default_rate_ceiling: DEFAULT_RATE_CEILING,
            yield_multiplier: DEFAULT_YIELD_MULTIPLIER,
            fee_unit: FEE_UNIT,
            retention_percent: DEFAULT_RETENTION_PERCENT,
            quota_ratio: DEFAULT_QUOTA_RATIO,
            tier_breakpoints: [
                Ratio::new(a.0, a.1),
                Ratio::new(b.0, b.1),
                Ratio::new(c.0, c.1),
                Ratio::new(d.0, d.1),
            ],
        }
    }
}

impl RateParameters {
    /// Check internal consistency.
    ///
    /// Rejects a zero fee unit, a retention above 100%, zero denominators and
    /// breakpoints that are not strictly increasing.
    pub fn validate(&self) -> Result<(), EmissionError> {
        if self.fee_unit == 0 {
            return Err(EmissionError::Config("fee_unit must be positive".into()));
        }
        if self.retention_percent > PERCENT_BASE {
            return Err(EmissionError::Config(format!(
                "retention_percent {} exceeds {PERCENT_BASE}",
                self.retention_percent
            )));
        }
        if self.tier_breakpoints.iter().any(|r| r.den == 0) {
            return Err(EmissionError::Config(
                "tier breakpoint with zero denominator".into(),
            ));
        }
        if !self
            .tier_breakpoints
            .windows(2)
            .all(|pair| pair[0].lt(&pair[1]))
        {
            return Err(EmissionError::Config(
                "tier breakpoints must be strictly increasing".into(),
            ));
        }
        Ok(())
    }
}

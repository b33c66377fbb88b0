//! Turnover classification.
//!
//! Maps the `y / x` imbalance of a pool to one of five [`Tier`]s. Each
//! breakpoint `num / den` is an inclusive upper bound, tested as
//! `y * den <= x * num`, so `x == 0` needs no special case: an empty pool
//! (`0 / 0`) lands in the lowest band and a pool with `x == 0, y > 0`
//! (infinite ratio) lands in the highest.

use ember_core::math::widen;
use ember_core::params::{RateParameters, Ratio};
use ember_core::types::{Amount, Tier};

/// Five-band step function over the `y / x` ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnoverClassifier {
    breakpoints: [Ratio; 4],
}

impl TurnoverClassifier {
    pub fn new(params: &RateParameters) -> Self {
        Self {
            breakpoints: params.tier_breakpoints,
        }
    }

    /// Tier for reserves `(x, y)`.
    pub fn tier(&self, x: Amount, y: Amount) -> Tier {
        let lhs = widen(y);
        let rhs = widen(x);
        for (bound, tier) in self.breakpoints.iter().zip(Tier::ALL) {
            if lhs * widen(bound.den as u128) <= rhs * widen(bound.num as u128) {
                return tier;
            }
        }
        Tier::Peak
    }
}

//! Baseline emission rate.
//!
//! `candidate = reward_rate * yield_multiplier * NAVPS_BASE * RATE_BASE
//!              / (supply * nav_per_share * max(pool_count, 1))`
//!
//! then `rate = min(candidate, ceiling)`. An empty pool (zero supply or zero
//! NAV) has an unbounded candidate and therefore emits at the ceiling.
//! Both products are formed in 512 bits, so the quotient is exact before
//! rounding down.

use ember_core::constants::{NAVPS_BASE, RATE_BASE};
use ember_core::error::EmissionError;
use ember_core::math::{narrow, product, widen};
use ember_core::params::RateParameters;
use ember_core::types::Amount;

/// Derives a per-fee-unit emission rate from reward-pool state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateCalculator {
    ceiling: Amount,
    yield_multiplier: u128,
}

impl RateCalculator {
    pub fn new(params: &RateParameters) -> Self {
        Self {
            ceiling: params.default_rate_ceiling,
            yield_multiplier: params.yield_multiplier,
        }
    }

    /// The protocol rate ceiling.
    pub fn ceiling(&self) -> Amount {
        self.ceiling
    }

    /// Baseline rate for a pool, clamped to [`ceiling`](Self::ceiling).
    ///
    /// `pool_count == 0` is treated as a single pool.
    pub fn baseline_rate(
        &self,
        pool_reward_rate: Amount,
        pool_supply: Amount,
        nav_per_share: Amount,
        pool_count: u64,
    ) -> Result<Amount, EmissionError> {
        let pools = pool_count.max(1) as u128;
        let denominator = product(&[pool_supply, nav_per_share, pools])?;
        if denominator.is_zero() {
            return Ok(self.ceiling);
        }

        let numerator = product(&[pool_reward_rate, self.yield_multiplier, NAVPS_BASE])?
            .checked_mul(widen(RATE_BASE))
            .ok_or(EmissionError::ArithmeticOverflow)?;
        let candidate = numerator / denominator;

        if candidate >= widen(self.ceiling) {
            return Ok(self.ceiling);
        }
        narrow(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::constants::{DEFAULT_RATE_CEILING, TOKEN};
    use proptest::prelude::*;

    fn calc() -> RateCalculator {
        RateCalculator::new(&RateParameters::default())
    }

    // --- reference points ---

    #[test]
    fn small_supply_hits_ceiling() {
        // 10 * 8e6 / 10000 = 8000 > 4000
        let rate = calc()
            .baseline_rate(10 * TOKEN, 10_000 * TOKEN, TOKEN, 1)
            .unwrap();
        assert_eq!(rate, DEFAULT_RATE_CEILING);
    }

    #[test]
    fn exactly_at_ceiling() {
        // 10 * 8e6 / 20000 = 4000
        let rate = calc()
            .baseline_rate(10 * TOKEN, 20_000 * TOKEN, TOKEN, 1)
            .unwrap();
        assert_eq!(rate, 4_000 * TOKEN);
    }

    #[test]
    fn below_ceiling() {
        // 10 * 8e6 / 40000 = 2000
        let rate = calc()
            .baseline_rate(10 * TOKEN, 40_000 * TOKEN, TOKEN, 1)
            .unwrap();
        assert_eq!(rate, 2_000 * TOKEN);
    }

    #[test]
    fn pool_count_divides_rate() {
        // 10 * 8e6 / 40000 / 2 = 1000
        let rate = calc()
            .baseline_rate(10 * TOKEN, 40_000 * TOKEN, TOKEN, 2)
            .unwrap();
        assert_eq!(rate, 1_000 * TOKEN);
    }

    #[test]
    fn zero_pool_count_equals_one() {
        let c = calc();
        for supply in [10_000 * TOKEN, 40_000 * TOKEN, 123_456 * TOKEN] {
            assert_eq!(
                c.baseline_rate(5 * TOKEN, supply, TOKEN, 0).unwrap(),
                c.baseline_rate(5 * TOKEN, supply, TOKEN, 1).unwrap()
            );
        }
    }

    #[test]
    fn nav_scales_inversely() {
        // nav = 2.0 halves the rate: 10 * 8e6 / (40000 * 2) = 1000
        let rate = calc()
            .baseline_rate(10 * TOKEN, 40_000 * TOKEN, 2 * TOKEN, 1)
            .unwrap();
        assert_eq!(rate, 1_000 * TOKEN);
    }

    #[test]
    fn empty_supply_emits_at_ceiling() {
        let c = calc();
        assert_eq!(c.baseline_rate(10 * TOKEN, 0, TOKEN, 1).unwrap(), c.ceiling());
        assert_eq!(c.baseline_rate(10 * TOKEN, TOKEN, 0, 1).unwrap(), c.ceiling());
    }

    #[test]
    fn zero_reward_rate_is_zero() {
        assert_eq!(calc().baseline_rate(0, 10_000 * TOKEN, TOKEN, 1).unwrap(), 0);
    }

    #[test]
    fn extreme_inputs_do_not_wrap() {
        let rate = calc()
            .baseline_rate(u128::MAX, u128::MAX, u128::MAX, u64::MAX)
            .unwrap();
        assert!(rate <= DEFAULT_RATE_CEILING);
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn never_exceeds_ceiling(
            bt in 0u128..1u128 << 100,
            xt in 0u128..1u128 << 100,
            np in 0u128..1u128 << 80,
            q in 0u64..1_000,
        ) {
            let rate = calc().baseline_rate(bt, xt, np, q).unwrap();
            prop_assert!(rate <= DEFAULT_RATE_CEILING);
        }

        #[test]
        fn non_increasing_in_supply(
            bt in 0u128..1_000 * TOKEN,
            a in 1u128..1_000_000 * TOKEN,
            b in 1u128..1_000_000 * TOKEN,
            np in 1u128..10 * TOKEN,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let c = calc();
            prop_assert!(c.baseline_rate(bt, lo, np, 1).unwrap() >= c.baseline_rate(bt, hi, np, 1).unwrap());
        }

        #[test]
        fn non_increasing_in_nav(
            bt in 0u128..1_000 * TOKEN,
            xt in 1u128..1_000_000 * TOKEN,
            a in 1u128..10 * TOKEN,
            b in 1u128..10 * TOKEN,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let c = calc();
            prop_assert!(c.baseline_rate(bt, xt, lo, 1).unwrap() >= c.baseline_rate(bt, xt, hi, 1).unwrap());
        }

        #[test]
        fn non_decreasing_in_reward_rate(
            a in 0u128..1_000 * TOKEN,
            b in 0u128..1_000 * TOKEN,
            xt in 1u128..1_000_000 * TOKEN,
            np in 1u128..10 * TOKEN,
            q in 0u64..16,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let c = calc();
            prop_assert!(c.baseline_rate(lo, xt, np, q).unwrap() <= c.baseline_rate(hi, xt, np, q).unwrap());
        }
    }
}

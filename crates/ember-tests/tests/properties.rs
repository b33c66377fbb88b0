//! Property tests over whole reward sequences.
//!
//! Each property runs 256 cases with proptest shrinking.

use proptest::prelude::*;

use ember_core::constants::TOKEN;
use ember_core::types::Tier;
use ember_tests::helpers::*;

fn fee_strategy() -> impl Strategy<Value = u128> {
    0u128..TOKEN
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Splitting one fee into many calls builds the same density.
    #[test]
    fn split_calls_build_same_density(fees in proptest::collection::vec(fee_strategy(), 1..16)) {
        let split = Harness::wired();
        for fee in &fees {
            split.reward(*fee).unwrap();
        }

        let single = Harness::wired();
        let total: u128 = fees.iter().sum();
        let d = single.reward(total).unwrap();

        let pool = addr(POOL);
        let split_density = split.distributor.engine().quota_tracker().density(&pool).unwrap();
        prop_assert_eq!(split_density, d.density);
    }

    /// A quote taken just before a distribution predicts it exactly.
    #[test]
    fn quote_predicts_distribution(fees in proptest::collection::vec(fee_strategy(), 1..16)) {
        let h = Harness::wired();
        for fee in fees {
            let quote = h.distributor.quote(&addr(POOL), fee, RESERVE, RESERVE, TOKEN).unwrap();
            let d = h.reward(fee).unwrap();
            prop_assert_eq!(quote.std_amount, d.std_amount);
            prop_assert_eq!(quote.actual_amount, d.actual_amount);
            prop_assert_eq!(quote.density, d.density);
            prop_assert_eq!(quote.tier, d.tier);
        }
    }

    /// Minted supply equals the sum of actual amounts and never exceeds
    /// what was requested.
    #[test]
    fn minted_supply_is_conserved(fees in proptest::collection::vec(fee_strategy(), 1..16)) {
        let h = Harness::wired();
        let mut requested = 0u128;
        let mut minted = 0u128;
        let mut last_density = 0u128;
        for fee in fees {
            let d = h.reward(fee).unwrap();
            prop_assert!(d.actual_amount <= d.std_amount);
            prop_assert_eq!(d.to_recipient + d.retained, d.actual_amount);
            prop_assert!(d.density >= last_density);
            last_density = d.density;
            requested += d.std_amount;
            minted += d.actual_amount;
        }
        prop_assert!(minted <= requested);
        prop_assert_eq!(h.token.total_supply(), minted);
        prop_assert_eq!(
            h.token.balance_of(&addr(USER)) + h.token.balance_of(&addr(HOLDING)),
            minted
        );
    }

    /// The same request pays less once the pool is under pressure.
    #[test]
    fn payout_falls_with_pressure(fee in 1u128..TOKEN, warmup in 1u128..10 * TOKEN) {
        let fresh = Harness::wired();
        let fresh_quote = fresh.distributor.quote(&addr(POOL), fee, RESERVE, RESERVE, TOKEN).unwrap();

        let pressed = Harness::wired();
        pressed.reward(warmup).unwrap();
        let pressed_quote = pressed.distributor.quote(&addr(POOL), fee, RESERVE, RESERVE, TOKEN).unwrap();

        prop_assert!(pressed_quote.actual_amount <= fresh_quote.actual_amount);
    }

    /// More outflow relative to the pool never lowers the tier.
    #[test]
    fn tier_monotonic_in_outflow(x in 1u128..1u128 << 96, y in 0u128..1u128 << 96, extra in 0u128..1u128 << 96) {
        let h = Harness::wired();
        let engine = h.distributor.engine();
        prop_assert!(engine.tier(x, y) <= engine.tier(x, y + extra));
    }
}

#[test]
fn empty_pool_side_is_dormant() {
    let h = Harness::wired();
    assert_eq!(h.distributor.engine().tier(RESERVE, 0), Tier::Dormant);
}

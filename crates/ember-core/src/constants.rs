//! Protocol constants. All token amounts are fixed-point with 18 decimals
//! (1 EMBER = 10^18 units).

/// One whole reward token in base units.
pub const TOKEN: u128 = 1_000_000_000_000_000_000;

/// Fixed-point base of emission rates.
pub const RATE_BASE: u128 = TOKEN;

/// Fixed-point base of the net-asset-value-per-share input.
pub const NAVPS_BASE: u128 = TOKEN;

/// Normalization base of the fee input: a fee of `FEE_UNIT` mints one `rate`.
pub const FEE_UNIT: u128 = TOKEN;

/// Protocol ceiling on the baseline emission rate (4000 tokens per fee unit).
pub const DEFAULT_RATE_CEILING: u128 = 4_000 * TOKEN;

/// Yield multiplier of the baseline rate formula.
///
/// `rate = reward_rate * 2_400_000 / (supply * nav * 0.3) / pools`, and
/// `2_400_000 / 0.3 = 8_000_000`.
pub const DEFAULT_YIELD_MULTIPLIER: u128 = 8_000_000;

/// Percentage of every minted amount credited to the recipient.
/// The remainder stays at the engine's holding address.
pub const DEFAULT_RETENTION_PERCENT: u64 = 80;

/// Denominator of [`DEFAULT_RETENTION_PERCENT`].
pub const PERCENT_BASE: u64 = 100;

/// Denominator of tier multipliers (`150` = 1.5×).
pub const TIER_BASE: u64 = 100;

/// Share of pool reserves (`x + y`) granted as emission quota at a 1.0× tier,
/// scaled by [`RATE_BASE`]. 2.5%.
pub const DEFAULT_QUOTA_RATIO: u128 = 25_000_000_000_000_000;

/// Basis-point precision used by configuration files.
pub const BPS_PRECISION: u64 = 10_000;

/// Inclusive upper bounds of the first four turnover bands as `(num, den)`
/// ratios of `y / x`: 0.1, 1/3, 3 and 10. Anything above the last bound is
/// the peak band.
pub const DEFAULT_TIER_BREAKPOINTS: [(u64, u64); 4] = [(1, 10), (1, 3), (3, 1), (10, 1)];

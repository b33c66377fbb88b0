//! Widened fixed-point arithmetic.
//!
//! Every multiply-then-divide in the engine goes through a 512-bit
//! intermediate so that products of up to three `u128` factors are exact.
//! Results are narrowed back to [`Amount`] with an explicit overflow check;
//! nothing wraps.

use primitive_types::U512;

use crate::error::EmissionError;
use crate::types::Amount;

/// Lift a `u128` into the 512-bit domain.
pub fn widen(value: u128) -> U512 {
    U512::from(value)
}

/// Exact product of `factors` in 512 bits.
pub fn product(factors: &[u128]) -> Result<U512, EmissionError> {
    factors.iter().try_fold(U512::one(), |acc, &f| {
        acc.checked_mul(widen(f))
            .ok_or(EmissionError::ArithmeticOverflow)
    })
}

/// Narrow a 512-bit value back to an [`Amount`].
pub fn narrow(value: U512) -> Result<Amount, EmissionError> {
    if value > widen(u128::MAX) {
        return Err(EmissionError::ArithmeticOverflow);
    }
    Ok(value.low_u128())
}

/// Narrow a 512-bit value, clamping at `u128::MAX`.
pub fn narrow_saturating(value: U512) -> Amount {
    narrow(value).unwrap_or(u128::MAX)
}

/// `a * b / c` with a 512-bit intermediate, rounding down.
///
/// A zero divisor is reported as [`EmissionError::ArithmeticOverflow`].
pub fn mul_div(a: u128, b: u128, c: u128) -> Result<Amount, EmissionError> {
    if c == 0 {
        return Err(EmissionError::ArithmeticOverflow);
    }
    narrow(widen(a) * widen(b) / widen(c))
}

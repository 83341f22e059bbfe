//! Widened integer helpers
//!
//! Every product is taken in `u128` before any division, and every
//! narrowing back to `u64` is checked.

use crate::{CurveError, BPS_SCALE};

/// Multiply two u64 values into u128 (never overflows)
#[inline]
pub fn mul_u64(a: u64, b: u64) -> u128 {
    (a as u128) * (b as u128)
}

/// Divide, rounding down
#[inline]
pub fn div_floor(numerator: u128, denominator: u128) -> Result<u128, CurveError> {
    if denominator == 0 {
        return Err(CurveError::DivisionByZero);
    }
    Ok(numerator / denominator)
}

/// Divide, rounding up
#[inline]
pub fn div_ceil(numerator: u128, denominator: u128) -> Result<u128, CurveError> {
    if denominator == 0 {
        return Err(CurveError::DivisionByZero);
    }
    let q = numerator / denominator;
    if numerator % denominator == 0 {
        Ok(q)
    } else {
        q.checked_add(1).ok_or(CurveError::Overflow)
    }
}

/// Narrow u128 to u64
#[inline]
pub fn to_u64(value: u128) -> Result<u64, CurveError> {
    u64::try_from(value).map_err(|_| CurveError::Truncation)
}

/// `floor(a * b / c)` narrowed to u64
#[inline]
pub fn mul_div_floor(a: u64, b: u64, c: u64) -> Result<u64, CurveError> {
    to_u64(div_floor(mul_u64(a, b), c as u128)?)
}

/// `ceil(a * b / c)` narrowed to u64
#[inline]
pub fn mul_div_ceil(a: u64, b: u64, c: u64) -> Result<u64, CurveError> {
    to_u64(div_ceil(mul_u64(a, b), c as u128)?)
}

/// `ceil(amount * bps / 10_000)`
#[inline]
pub fn bps_ceil(amount: u64, bps: u64) -> Result<u64, CurveError> {
    mul_div_ceil(amount, bps, BPS_SCALE)
}

/// `floor(amount * bps / 10_000)`
#[inline]
pub fn bps_floor(amount: u64, bps: u64) -> Result<u64, CurveError> {
    mul_div_floor(amount, bps, BPS_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_rounding() {
        assert_eq!(div_floor(7, 2).unwrap(), 3);
        assert_eq!(div_ceil(7, 2).unwrap(), 4);
        assert_eq!(div_ceil(8, 2).unwrap(), 4);
        assert_eq!(div_ceil(0, 5).unwrap(), 0);
        assert_eq!(div_floor(1, 0), Err(CurveError::DivisionByZero));
        assert_eq!(div_ceil(1, 0), Err(CurveError::DivisionByZero));
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        // u64::MAX * u64::MAX overflows u64 but not u128
        assert_eq!(mul_div_floor(u64::MAX, u64::MAX, u64::MAX).unwrap(), u64::MAX);
        assert_eq!(mul_div_floor(u64::MAX, 2, 1), Err(CurveError::Truncation));
    }

    #[test]
    fn test_bps_rounding() {
        assert_eq!(bps_ceil(990_099_009, 100).unwrap(), 9_900_991);
        assert_eq!(bps_floor(990_099_009, 100).unwrap(), 9_900_990);
        assert_eq!(bps_ceil(10_000, 100).unwrap(), 100);
        assert_eq!(bps_ceil(1, 1).unwrap(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════
// KANI FORMAL VERIFICATION PROOFS
// ═══════════════════════════════════════════════════════════════

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Ceil and floor differ by at most one and bracket the exact quotient
    #[kani::proof]
    fn m1_ceil_floor_bracket() {
        let n: u64 = kani::any();
        let d: u64 = kani::any();
        kani::assume(d > 0);

        let lo = div_floor(n as u128, d as u128).unwrap();
        let hi = div_ceil(n as u128, d as u128).unwrap();

        assert!(hi >= lo);
        assert!(hi - lo <= 1);
        assert!(lo * (d as u128) <= n as u128);
        assert!(hi * (d as u128) >= n as u128);
    }

    /// Ceil bps fee never exceeds the amount for bps <= 10_000
    #[kani::proof]
    fn m2_fee_bounded_by_amount() {
        let amount: u64 = kani::any();
        let bps: u64 = kani::any();
        kani::assume(bps <= BPS_SCALE);

        let f = bps_ceil(amount, bps).unwrap();
        assert!(f <= amount);
    }
}

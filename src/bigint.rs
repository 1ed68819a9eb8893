//! Arbitrary-precision unsigned arithmetic for the mining formula. Backed by
//! `primitive_types::U256`, which already covers equality, ordering, XOR and
//! division. This module only adds the two operations that need a guard
//! the raw type doesn't provide: division by a difficulty that might be
//! zero, and division by a denominator that might collide to zero.

use primitive_types::U256;

use crate::config::max_u256;
use crate::error::{MinerError, Result};

/// `(2^256 - 1) / difficulty`. `difficulty` must be strictly positive; the
/// spec requires this but a caller-supplied zero must not reach `U256`'s
/// division (which panics), so it is rejected here.
pub fn numerator_for_difficulty(difficulty: u32) -> Result<U256> {
    if difficulty == 0 {
        return Err(MinerError::InvalidDifficulty);
    }
    Ok(max_u256() / U256::from(difficulty))
}

/// `numerator / denom`, or `None` if `denom` is zero. A zero denominator
/// only arises from a 256-bit Keccak collision (`hashed == precomputed`),
/// arithmetically impossible in practice, but `U256`'s `Div` panics on zero,
/// so the search kernel treats it as a miss rather than trapping.
pub fn checked_div(numerator: U256, denom: U256) -> Option<U256> {
    if denom.is_zero() {
        None
    } else {
        Some(numerator / denom)
    }
}

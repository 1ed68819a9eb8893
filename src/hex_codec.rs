//! Hex <-> bytes <-> big-integer conversions shared by the hasher and the
//! search kernel. Mirrors the original `helpers/convert.cpp` (`HexToByteArray`,
//! `HexToInteger`, `IntegerToString`) one-to-one.

use primitive_types::U256;

use crate::error::{MinerError, Result};

/// Strips an optional leading `0x`/`0X`, left-pads an odd-length remainder
/// with a single `0`, then decodes hex digit pairs into bytes.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>> {
    let stripped = strip_0x(s);

    let padded;
    let digits = if stripped.len() % 2 != 0 {
        padded = format!("0{stripped}");
        padded.as_str()
    } else {
        stripped
    };

    hex::decode(digits).map_err(|_| MinerError::InvalidHex)
}

/// Interprets `hex_to_bytes(s)` as a big-endian unsigned integer.
pub fn hex_to_uint(s: &str) -> Result<U256> {
    let bytes = hex_to_bytes(s)?;
    if bytes.len() > 32 {
        return Err(MinerError::InvalidHex);
    }
    Ok(U256::from_big_endian(&bytes))
}

/// Renders `n` in the given base. Only base 10 and base 16 are supported;
/// base 16 is lowercase with no `0x` prefix. Zero renders as `"0"` in both
/// bases, and no other value carries leading zeros.
pub fn uint_to_string(n: U256, base: u32) -> Result<String> {
    match base {
        10 => Ok(n.to_string()),
        16 => {
            if n.is_zero() {
                Ok("0".to_string())
            } else {
                let mut bytes = [0u8; 32];
                n.to_big_endian(&mut bytes);
                let encoded = hex::encode(minimal_be(&bytes));
                let trimmed = encoded.trim_start_matches('0');
                Ok(if trimmed.is_empty() {
                    "0".to_string()
                } else {
                    trimmed.to_string()
                })
            }
        }
        _ => Err(MinerError::InvalidBase),
    }
}

/// The shortest big-endian byte slice representing `n`; the empty slice for
/// zero. Used by the hasher's big-integer preimage (left-pad is deliberately
/// *not* applied there, see `hasher::hash_uint`).
pub fn minimal_be(full_be: &[u8]) -> &[u8] {
    let first_nonzero = full_be.iter().position(|&b| b != 0);
    match first_nonzero {
        Some(i) => &full_be[i..],
        None => &full_be[full_be.len()..],
    }
}

fn strip_0x(s: &str) -> &str {
    if s.len() > 1 && (s.starts_with("0x") || s.starts_with("0X")) {
        &s[2..]
    } else {
        s
    }
}

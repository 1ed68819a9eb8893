//! Keccak-256 ("soliditySha3") digests over the three preimage shapes the
//! on-chain gas-mining verifier expects. This is the pre-NIST Keccak variant
//! (0x01 padding): `tiny_keccak::Keccak`, not `sha3::Sha3_256`.

use primitive_types::U256;
use tiny_keccak::{Hasher as _, Keccak};

use crate::hex_codec::minimal_be;

/// `H(bytes) -> "0x" + lowercase_hex(32 bytes)`.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut keccak = Keccak::v256();
    keccak.update(data);
    let mut out = [0u8; 32];
    keccak.finalize(&mut out);
    format!("0x{}", hex::encode(out))
}

/// `H(uint)`: hashes the *minimal* big-endian encoding of `n` (the empty
/// byte string for zero), matching the on-chain ABI encoding of a
/// dynamically-sized integer. Deliberately not zero-padded to 32 bytes;
/// see `hash_u64` for the case that is.
pub fn hash_uint(n: U256) -> String {
    let mut bytes = [0u8; 32];
    n.to_big_endian(&mut bytes);
    hash_bytes(minimal_be(&bytes))
}

/// `H(u64)`: hashes 32 big-endian bytes, left-padded with zeros. Used for
/// the session nonce, which the on-chain verifier treats as a fixed-width
/// `uint256` rather than a dynamically-sized value.
pub fn hash_u64(value: u64) -> String {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&value.to_be_bytes());
    hash_bytes(&bytes)
}

//! The per-worker search loop: draw a random candidate, hash it, fold it
//! against the session's precomputed value, and check whether the result
//! clears the target. First worker to clear it publishes the winner and
//! requests cancellation for the rest.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use primitive_types::U256;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::bigint::checked_div;
use crate::config::CANDIDATE_BYTES;
use crate::hasher;
use crate::hex_codec::hex_to_uint;

/// Constants derived once per session and shared, read-only, by every
/// worker (see `Session::derive_constants`).
#[derive(Clone, Copy)]
pub struct DerivedConstants {
    pub numerator: U256,
    pub precomputed: U256,
}

/// Mutable state shared across all workers of one session.
pub struct SharedWinner {
    pub result_found: AtomicBool,
    pub result: Mutex<String>,
}

impl SharedWinner {
    pub fn new() -> Self {
        Self {
            result_found: AtomicBool::new(false),
            result: Mutex::new(String::new()),
        }
    }
}

/// Runs until `cancel` is requested or this worker finds a winner.
/// `counter` is incremented once per completed iteration; it belongs
/// exclusively to this worker; only the aggregator thread resets it.
pub fn run_worker(
    amount: u64,
    constants: DerivedConstants,
    counter: Arc<AtomicU64>,
    cancel: Arc<AtomicBool>,
    winner: Arc<SharedWinner>,
) {
    let amount = U256::from(amount);
    let mut rng = OsRng;
    let mut candidate_bytes = [0u8; CANDIDATE_BYTES];

    while !cancel.load(Ordering::Relaxed) {
        rng.fill_bytes(&mut candidate_bytes);
        let candidate_hex = hex::encode(candidate_bytes);

        // Round-trips hex -> uint the way the original implementation does;
        // equivalent to interpreting the random bytes directly as a
        // big-endian 256-bit integer (see SPEC_FULL.md Open Questions).
        let candidate_int = U256::from_big_endian(&candidate_bytes);
        let hashed = match hex_to_uint(&hasher::hash_uint(candidate_int)) {
            Ok(h) => h,
            Err(_) => {
                counter.fetch_add(1, Ordering::Relaxed);
                continue;
            }
        };
        let denom = constants.precomputed ^ hashed;

        counter.fetch_add(1, Ordering::Relaxed);

        let Some(external_gas) = checked_div(constants.numerator, denom) else {
            // denom == 0: a 256-bit collision. Arithmetically impossible in
            // practice; treat this iteration as a miss rather than trap.
            continue;
        };

        if external_gas >= amount {
            if winner
                .result_found
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                *winner.result.lock() = candidate_int.to_string();
                cancel.store(true, Ordering::SeqCst);
                log::info!("winner found: external_gas >= amount, candidate hex {candidate_hex}");
            }
            break;
        }
    }
}

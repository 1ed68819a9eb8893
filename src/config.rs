// Tunables for the mining engine, kept as a flat const module the way the
// rest of this codebase's `config.rs` files are structured, instead of
// scattering magic numbers through the engine.

use primitive_types::U256;

/// Width, in bytes, of a mining candidate (256 bits).
pub const CANDIDATE_BYTES: usize = 32;

/// How often the hash-rate aggregator sums and resets the per-worker
/// counters and reports to the caller's sink.
pub const AGGREGATION_INTERVAL_SECS: u64 = 1;

/// `2^256 - 1`, the largest value representable in 256 bits. Used as the
/// dividend of the per-session numerator.
pub fn max_u256() -> U256 {
    U256::MAX
}

/// Worker count for a session: hardware concurrency, clamped down to
/// `max_threads` when the caller asked for fewer threads than the machine
/// has.
pub fn resolve_thread_count(max_threads: u32) -> usize {
    let hw = num_cpus::get().max(1);
    if max_threads > 0 && (max_threads as usize) < hw {
        max_threads as usize
    } else {
        hw
    }
}

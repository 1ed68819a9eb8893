//! Runs on its own thread: once per second, sums and resets every worker's
//! counter, publishes the sum to the session's `hash_rate` atomic, and
//! forwards it to the caller-supplied rate sink.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AGGREGATION_INTERVAL_SECS;

/// Any sink accepting the aggregated hashes/second sample. The FFI layer
/// adapts a raw `extern "C"` function pointer to this trait; native callers
/// can pass a closure directly.
pub trait RateSink: Send {
    fn on_rate(&mut self, hashes_per_second: u64);
}

impl<F: FnMut(u64) + Send> RateSink for F {
    fn on_rate(&mut self, hashes_per_second: u64) {
        self(hashes_per_second)
    }
}

/// Runs until `cancel` is requested, checked once between ticks, an
/// in-flight one-second sleep may delay exit, which is tolerated.
///
/// Each entry in `counters` is independently owned by one worker thread
/// (see `Session::mine`), wrapped in its own `Arc` so both that worker and
/// this aggregator can hold a reference to the same atomic.
pub fn run(
    counters: Arc<Vec<Arc<AtomicU64>>>,
    hash_rate: Arc<AtomicU64>,
    cancel: Arc<AtomicBool>,
    mut sink: impl RateSink,
) {
    while !cancel.load(Ordering::Relaxed) {
        let sum: u64 = counters
            .iter()
            .map(|c| c.swap(0, Ordering::Relaxed))
            .sum();

        hash_rate.store(sum, Ordering::Relaxed);
        log::debug!("hash rate tick: {sum} h/s");
        sink.on_rate(sum);

        std::thread::sleep(Duration::from_secs(AGGREGATION_INTERVAL_SECS));
    }
}

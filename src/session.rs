//! The process-wide mining session: lifecycle state, worker/aggregator
//! spawn and join, the single cancellation token, and the public entry
//! points `mine`, `stop`, `is_mining`, `hash_rate`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use primitive_types::U256;

use crate::aggregator::{self, RateSink};
use crate::bigint::numerator_for_difficulty;
use crate::error::MinerError;
use crate::hasher;
use crate::hex_codec::hex_to_bytes;
use crate::kernel::{self, DerivedConstants, SharedWinner};

/// Any sink accepting the final outcome of a `mine` call. Invoked exactly
/// once per accepted call, from the thread that called `mine`.
pub trait ResultSink: Send {
    fn on_result(&mut self, success: bool, candidate: &str, error: &str);
}

impl<F: FnMut(bool, &str, &str) + Send> ResultSink for F {
    fn on_result(&mut self, success: bool, candidate: &str, error: &str) {
        self(success, candidate, error)
    }
}

/// Guards session start/stop so at most one `mine` call is ever in flight.
/// `cancel` is replaced with a fresh token at the start of every session;
/// `stop()` reads the current one under the same lock so it can never
/// signal a token that has already been superseded.
struct Lifecycle {
    is_mining: bool,
    cancel: Arc<AtomicBool>,
}

pub struct Session {
    is_mining: AtomicBool,
    hash_rate: Arc<AtomicU64>,
    lifecycle: Mutex<Lifecycle>,
}

static SESSION: Lazy<Session> = Lazy::new(Session::new);

impl Session {
    fn new() -> Self {
        Self {
            is_mining: AtomicBool::new(false),
            hash_rate: Arc::new(AtomicU64::new(0)),
            lifecycle: Mutex::new(Lifecycle {
                is_mining: false,
                cancel: Arc::new(AtomicBool::new(false)),
            }),
        }
    }

    pub fn instance() -> &'static Session {
        &SESSION
    }

    pub fn is_mining(&self) -> bool {
        self.is_mining.load(Ordering::Acquire)
    }

    pub fn hash_rate(&self) -> u64 {
        self.hash_rate.load(Ordering::Relaxed)
    }

    /// Requests cancellation of the in-flight session, if any. The actual
    /// join happens inside the in-flight `mine` call; this only flips the
    /// shared flag and resets the externally-visible counters. Idempotent.
    pub fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock();
        if !lifecycle.is_mining {
            return;
        }
        log::info!("stop() requested, cancelling active session");
        lifecycle.cancel.store(true, Ordering::SeqCst);
        lifecycle.is_mining = false;
        self.is_mining.store(false, Ordering::Release);
        self.hash_rate.store(0, Ordering::Relaxed);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn mine(
        &self,
        amount: u64,
        from_address: &str,
        nonce: u64,
        difficulty: u32,
        max_threads: u32,
        rate_sink: impl RateSink,
        mut result_sink: impl ResultSink,
    ) {
        let cancel = {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.is_mining {
                log::warn!("mine() rejected: a session is already active");
                result_sink.on_result(false, "", &MinerError::AlreadyMining.to_string());
                return;
            }
            let cancel = Arc::new(AtomicBool::new(false));
            lifecycle.is_mining = true;
            lifecycle.cancel = Arc::clone(&cancel);
            cancel
        };

        self.is_mining.store(true, Ordering::Release);
        self.hash_rate.store(0, Ordering::Relaxed);

        let constants = match self.derive_constants(from_address, nonce, difficulty) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("mine() rejected: {e}");
                self.teardown();
                result_sink.on_result(false, "", &e.to_string());
                return;
            }
        };

        let thread_count = crate::config::resolve_thread_count(max_threads);
        log::info!(
            "mine() starting: {thread_count} workers, difficulty={difficulty}, amount={amount}"
        );

        let winner = Arc::new(SharedWinner::new());
        // Each counter is independently owned: the worker that increments it
        // holds one `Arc`, the aggregator that resets it holds another.
        let per_worker_counters: Vec<Arc<AtomicU64>> =
            (0..thread_count).map(|_| Arc::new(AtomicU64::new(0))).collect();

        let workers: Vec<_> = per_worker_counters
            .iter()
            .enumerate()
            .map(|(i, counter)| {
                let counter = Arc::clone(counter);
                let cancel = Arc::clone(&cancel);
                let winner = Arc::clone(&winner);
                std::thread::Builder::new()
                    .name(format!("skale-gas-miner-worker-{i}"))
                    .spawn(move || kernel::run_worker(amount, constants, counter, cancel, winner))
                    .expect("failed to spawn mining worker thread")
            })
            .collect();

        let hash_rate_handle = {
            let counters = Arc::new(per_worker_counters);
            let hash_rate = Arc::clone(&self.hash_rate);
            let cancel = Arc::clone(&cancel);
            std::thread::Builder::new()
                .name("skale-gas-miner-aggregator".to_string())
                .spawn(move || aggregator::run(counters, hash_rate, cancel, rate_sink))
                .expect("failed to spawn hash-rate aggregator thread")
        };

        for (i, handle) in workers.into_iter().enumerate() {
            if let Err(panic) = handle.join() {
                log::error!("mining worker {i} panicked: {panic:?}");
            }
        }
        // Every worker has exited (winner found or cancellation observed);
        // request cancellation unconditionally so the aggregator, which may
        // still be mid-sleep, wakes on its next tick and exits too.
        cancel.store(true, Ordering::SeqCst);
        if let Err(panic) = hash_rate_handle.join() {
            log::error!("hash-rate aggregator panicked: {panic:?}");
        }

        self.teardown();

        let result = winner.result.lock().clone();
        if result.is_empty() {
            log::info!("mine() ended: aborted, no winner");
            result_sink.on_result(false, "", &MinerError::Aborted.to_string());
        } else {
            log::info!("mine() ended: winner found");
            result_sink.on_result(true, &result, "");
        }
    }

    fn teardown(&self) {
        let mut lifecycle = self.lifecycle.lock();
        lifecycle.is_mining = false;
        self.is_mining.store(false, Ordering::Release);
        self.hash_rate.store(0, Ordering::Relaxed);
    }

    fn derive_constants(
        &self,
        from_address: &str,
        nonce: u64,
        difficulty: u32,
    ) -> Result<DerivedConstants, MinerError> {
        let numerator = numerator_for_difficulty(difficulty)?;

        let from_bytes = hex_to_bytes(from_address).map_err(|_| MinerError::InvalidFromAddress)?;
        let from_hash = hasher::hash_bytes(&from_bytes);
        let from_hash_int =
            crate::hex_codec::hex_to_uint(&from_hash).map_err(|_| MinerError::InvalidFromAddress)?;

        let nonce_hash = hasher::hash_u64(nonce);
        let nonce_hash_int =
            crate::hex_codec::hex_to_uint(&nonce_hash).map_err(|_| MinerError::InvalidHex)?;

        let precomputed: U256 = nonce_hash_int ^ from_hash_int;

        Ok(DerivedConstants {
            numerator,
            precomputed,
        })
    }
}

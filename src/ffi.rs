//! C ABI surface for embedding hosts. Every entry point validates its
//! pointer and string arguments before touching session state, and wraps
//! its body in `catch_unwind` so a panic inside the engine cannot unwind
//! across the FFI boundary into the host's frame.

use std::ffi::{c_char, CStr, CString};
use std::os::raw::c_int;
use std::panic::{self, AssertUnwindSafe};

use crate::session::{ResultSink, Session};

/// `extern "C" fn(hashes_per_second: u64)`.
pub type RateCallback = extern "C" fn(u64);

/// `extern "C" fn(success: bool, candidate_hex: *const c_char, error: *const c_char)`.
/// Exactly one of `candidate_hex`/`error` is a non-empty C string; the other
/// is an empty one, never null.
pub type ResultCallback = extern "C" fn(c_int, *const c_char, *const c_char);

/// Adapts a raw rate callback to `aggregator::RateSink`.
struct RateCallbackSink(RateCallback);

impl crate::aggregator::RateSink for RateCallbackSink {
    fn on_rate(&mut self, hashes_per_second: u64) {
        (self.0)(hashes_per_second);
    }
}

/// Adapts a raw result callback to `session::ResultSink`, marshalling the
/// Rust strings into short-lived `CString`s for the duration of the call.
struct ResultCallbackSink(ResultCallback);

impl ResultSink for ResultCallbackSink {
    fn on_result(&mut self, success: bool, candidate: &str, error: &str) {
        let candidate = CString::new(candidate).unwrap_or_default();
        let error = CString::new(error).unwrap_or_default();
        (self.0)(success as c_int, candidate.as_ptr(), error.as_ptr());
    }
}

/// `1` if a session is active, `0` otherwise.
#[no_mangle]
pub extern "C" fn skale_is_mining() -> c_int {
    catch_bool(|| Session::instance().is_mining())
}

/// Most recent aggregated hashes/second, `0` if no session is active.
#[no_mangle]
pub extern "C" fn skale_hash_rate() -> u64 {
    panic::catch_unwind(|| Session::instance().hash_rate()).unwrap_or(0)
}

/// Starts a mining session. Returns immediately if one is already active
/// (`result_callback` is invoked with `success = 0` and the "Already
/// mining" error) or if `from_address` fails validation; otherwise blocks
/// the calling thread until a winner is found or `skale_stop` is called,
/// invoking `rate_callback` roughly once per second and `result_callback`
/// exactly once before returning.
///
/// # Safety
/// `from_address` must be a valid, NUL-terminated, UTF-8 C string that
/// remains valid for the duration of the call. `rate_callback` and
/// `result_callback` must be valid function pointers.
#[no_mangle]
pub extern "C" fn skale_mine_gas(
    amount: u64,
    from_address: *const c_char,
    nonce: u64,
    difficulty: u32,
    rate_callback: RateCallback,
    result_callback: ResultCallback,
    max_threads: u32,
) {
    let from_address = match unsafe { validate_c_str(from_address) } {
        Ok(s) => s,
        Err(()) => {
            deliver_invalid_argument(result_callback);
            return;
        }
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        Session::instance().mine(
            amount,
            from_address,
            nonce,
            difficulty,
            max_threads,
            RateCallbackSink(rate_callback),
            ResultCallbackSink(result_callback),
        );
    }));

    if outcome.is_err() {
        log::error!("skale_mine_gas: engine panicked, session state may be stale");
    }
}

/// Requests cancellation of the active session, if any. Idempotent;
/// safe to call with no session active.
#[no_mangle]
pub extern "C" fn skale_stop() {
    let _ = panic::catch_unwind(|| Session::instance().stop());
}

fn catch_bool(f: impl FnOnce() -> bool + panic::UnwindSafe) -> c_int {
    panic::catch_unwind(f).unwrap_or(false) as c_int
}

/// # Safety
/// `ptr` must either be null or point to a valid, NUL-terminated C string.
unsafe fn validate_c_str<'a>(ptr: *const c_char) -> Result<&'a str, ()> {
    if ptr.is_null() {
        return Err(());
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().map_err(|_| ())
}

fn deliver_invalid_argument(result_callback: ResultCallback) {
    let empty = CString::default();
    let error = CString::new(crate::error::MinerError::InvalidFromAddress.to_string())
        .unwrap_or_default();
    result_callback(0, empty.as_ptr(), error.as_ptr());
}

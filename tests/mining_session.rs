//! End-to-end exercises of the public session entry points, the way a host
//! embedding this crate would drive them: no FFI trampolines, just
//! `Session::instance()` and closures for the two sinks.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use skale_gas_miner::Session;

fn from_address() -> &'static str {
    "0x000102030405060708090a0b0c0d0e0f10111213"
}

/// `Session` is a process-wide singleton; serialize the tests in this file
/// so one test's session doesn't observe another's in-flight "Already
/// mining" state.
fn serialized() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    static LOGGER: OnceLock<()> = OnceLock::new();
    LOGGER.get_or_init(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|e| e.into_inner())
}

#[test]
fn difficulty_one_finds_a_winner_on_the_first_try() {
    let _guard = serialized();
    let session = Session::instance();

    let success = Arc::new(AtomicBool::new(false));
    let candidate = Arc::new(Mutex::new(String::new()));
    let error = Arc::new(Mutex::new(String::new()));
    let rate_ticks = Arc::new(AtomicU64::new(0));

    let success2 = Arc::clone(&success);
    let candidate2 = Arc::clone(&candidate);
    let error2 = Arc::clone(&error);
    let rate_ticks2 = Arc::clone(&rate_ticks);

    session.mine(
        1,
        from_address(),
        42,
        1,
        1,
        move |_rate: u64| {
            rate_ticks2.fetch_add(1, Ordering::Relaxed);
        },
        move |ok: bool, cand: &str, err: &str| {
            success2.store(ok, Ordering::Relaxed);
            *candidate2.lock().unwrap() = cand.to_string();
            *error2.lock().unwrap() = err.to_string();
        },
    );

    assert!(success.load(Ordering::Relaxed));
    assert!(!candidate.lock().unwrap().is_empty());
    assert!(error.lock().unwrap().is_empty());
    assert!(!session.is_mining());
    assert_eq!(session.hash_rate(), 0);
}

#[test]
fn unreachable_target_is_aborted_by_stop() {
    let _guard = serialized();
    let session = Session::instance();

    let outcome = Arc::new(Mutex::new(None));
    let outcome2 = Arc::clone(&outcome);

    let handle = std::thread::spawn(move || {
        session.mine(
            u64::MAX,
            from_address(),
            7,
            1,
            1,
            |_rate: u64| {},
            move |ok: bool, cand: &str, err: &str| {
                *outcome2.lock().unwrap() = Some((ok, cand.to_string(), err.to_string()));
            },
        );
    });

    std::thread::sleep(Duration::from_millis(50));
    Session::instance().stop();
    handle.join().unwrap();

    let (ok, cand, err) = outcome.lock().unwrap().clone().expect("result_cb fired");
    if ok {
        assert!(!cand.is_empty());
        assert!(err.is_empty());
    } else {
        assert_eq!(cand, "");
        assert_eq!(err, "Aborted");
    }
    assert!(!Session::instance().is_mining());
}

#[test]
fn concurrent_mine_is_rejected_without_disturbing_the_first() {
    let _guard = serialized();
    let session = Session::instance();

    let first_done = Arc::new(AtomicBool::new(false));
    let first_done2 = Arc::clone(&first_done);
    let handle = std::thread::spawn(move || {
        session.mine(
            u64::MAX,
            from_address(),
            1,
            1,
            1,
            |_rate: u64| {},
            move |_ok: bool, _cand: &str, _err: &str| {
                first_done2.store(true, Ordering::Relaxed);
            },
        );
    });

    // Give the first session a moment to flip `is_mining` before the
    // second call races it.
    std::thread::sleep(Duration::from_millis(20));

    let rejected = Arc::new(Mutex::new(None));
    let rejected2 = Arc::clone(&rejected);
    Session::instance().mine(
        1,
        from_address(),
        1,
        1,
        1,
        |_rate: u64| {},
        move |ok: bool, cand: &str, err: &str| {
            *rejected2.lock().unwrap() = Some((ok, cand.to_string(), err.to_string()));
        },
    );

    let (ok, cand, err) = rejected.lock().unwrap().clone().expect("second mine_gas call rejected synchronously");
    assert!(!ok);
    assert_eq!(cand, "");
    assert_eq!(err, "Already mining");

    Session::instance().stop();
    handle.join().unwrap();
    assert!(!first_done.load(Ordering::Relaxed) || !Session::instance().is_mining());
}

#[test]
fn back_to_back_sessions_do_not_leak_state() {
    let _guard = serialized();
    let session = Session::instance();

    session.mine(
        1,
        from_address(),
        2,
        1,
        1,
        |_rate: u64| {},
        |_ok: bool, _cand: &str, _err: &str| {},
    );
    assert!(!session.is_mining());
    assert_eq!(session.hash_rate(), 0);

    let success = Arc::new(AtomicBool::new(false));
    let success2 = Arc::clone(&success);
    session.mine(
        1,
        from_address(),
        3,
        1,
        1,
        |_rate: u64| {},
        move |ok: bool, _cand: &str, _err: &str| success2.store(ok, Ordering::Relaxed),
    );

    assert!(success.load(Ordering::Relaxed));
    assert!(!session.is_mining());
    assert_eq!(session.hash_rate(), 0);
}

#[test]
fn zero_difficulty_is_rejected_before_any_worker_spawns() {
    let _guard = serialized();
    let session = Session::instance();
    let outcome = Arc::new(Mutex::new(None));
    let outcome2 = Arc::clone(&outcome);

    session.mine(
        1,
        from_address(),
        4,
        0,
        1,
        |_rate: u64| {},
        move |ok: bool, cand: &str, err: &str| {
            *outcome2.lock().unwrap() = Some((ok, cand.to_string(), err.to_string()));
        },
    );

    let (ok, cand, err) = outcome.lock().unwrap().clone().unwrap();
    assert!(!ok);
    assert_eq!(cand, "");
    assert_eq!(err, "Invalid difficulty");
    assert!(!session.is_mining());
}

//! Embeddable proof-of-work gas-mining engine for SKALE-style free-gas
//! chains. A host embeds this crate directly, or links against the
//! `cdylib` and drives it through the `ffi` module's C ABI.
//!
//! The mining loop itself does not touch the network: callers supply the
//! session parameters (`amount`, `from_address`, `nonce`, `difficulty`) and
//! receive the winning candidate back through a result sink; submitting it
//! on-chain is the host's responsibility.

pub mod aggregator;
pub mod bigint;
pub mod config;
pub mod error;
pub mod ffi;
pub mod hasher;
pub mod hex_codec;
pub mod kernel;
pub mod session;

pub use aggregator::RateSink;
pub use error::{MinerError, Result};
pub use session::{ResultSink, Session};

use thiserror::Error;

/// Helper-level and session-level failures.
///
/// Every variant has a stable, case-sensitive `Display` string. The FFI
/// layer and `SessionController::mine` both forward it verbatim as the
/// `error` argument of the result sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MinerError {
    #[error("Invalid hex")]
    InvalidHex,

    #[error("Invalid base")]
    InvalidBase,

    #[error("Invalid difficulty")]
    InvalidDifficulty,

    #[error("Invalid from_address")]
    InvalidFromAddress,

    #[error("Already mining")]
    AlreadyMining,

    #[error("Aborted")]
    Aborted,
}

pub type Result<T> = std::result::Result<T, MinerError>;

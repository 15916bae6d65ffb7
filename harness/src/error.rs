//! Harness Error Types
//!
//! Every failure the harness can report. None of them are handled locally:
//! they propagate with `?` out of `run_initialize_test` to the caller, which
//! is either a test (failing it) or the binary (exiting non-zero).

use thiserror::Error;

/// Errors returned by the harness.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The endpoint is unset, malformed, unreachable, or answered with a
    /// transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The named program could not be resolved, or nothing executable is
    /// deployed at its id.
    #[error("program `{name}` not found: {reason}")]
    ProgramNotFound { name: String, reason: String },

    /// The cluster rejected the transaction or did not confirm it in time.
    #[error("transaction rejected: {0}")]
    TransactionRejected(String),

    /// Local configuration (wallet, commitment, timeouts) is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl HarnessError {
    pub(crate) fn program_not_found(name: impl Into<String>, reason: impl Into<String>) -> Self {
        HarnessError::ProgramNotFound {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for HarnessError {
    fn from(e: reqwest::Error) -> Self {
        HarnessError::Network(e.to_string())
    }
}

/// Result alias used across the harness.
pub type HarnessResult<T> = Result<T, HarnessError>;

//! Harness error taxonomy

use restcheck_domain::{AssertionFailure, DomainError, SchemaMismatch};
use thiserror::Error;

use crate::ports::{HttpClientError, StoreError};

/// Everything that can fail a test case.
///
/// Each variant is a distinct category: a reader can tell a bad request
/// setup from a network problem, a wrong value from a wrong shape.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The request could not be built, e.g. an unresolved path placeholder.
    /// Raised before any network call.
    #[error("configuration error: {0}")]
    Config(#[from] DomainError),

    /// Connection refused, DNS failure or timeout. Never retried.
    #[error("network error: {0}")]
    Network(#[from] HttpClientError),

    /// The response did not match its expectations.
    #[error("assertion failure: {0}")]
    Assertion(#[from] AssertionFailure),

    /// The body could not be deserialized into the expected shape.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(#[from] SchemaMismatch),

    /// Persisting or restoring an object failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A data-driven case did not finish within its time bound.
    #[error("case '{case}' timed out after {timeout_ms}ms")]
    Timeout {
        /// Case name.
        case: String,
        /// Bound that was exceeded.
        timeout_ms: u64,
    },

    /// A data-driven case panicked.
    #[error("case '{case}' panicked: {message}")]
    Panicked {
        /// Case name.
        case: String,
        /// Panic payload, when it was a string.
        message: String,
    },

    /// The harness itself could not be set up (configuration, HTTP client).
    #[error("setup error: {0}")]
    Setup(String),
}

impl HarnessError {
    /// Short category name used in logs and reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Assertion(_) => "assertion",
            Self::SchemaMismatch(_) => "schema",
            Self::Store(_) => "store",
            Self::Timeout { .. } => "timeout",
            Self::Panicked { .. } => "panic",
            Self::Setup(_) => "setup",
        }
    }
}

/// Result type alias for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

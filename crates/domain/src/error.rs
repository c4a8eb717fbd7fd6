//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A `{placeholder}` in the request path has no matching path parameter.
    #[error("unresolved path parameter: {{{0}}}")]
    UnresolvedPathParam(String),

    /// A header name is invalid.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A JSON path expression could not be parsed.
    #[error("invalid JSON path '{path}': {reason}")]
    InvalidJsonPath {
        /// The offending expression.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A body is not valid JSON or could not be serialized.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A JSON path selected nothing.
    #[error("JSON path '{0}' not found")]
    PathNotFound(String),

    /// A JSON path selected a value of the wrong type.
    #[error("JSON path '{path}' has unexpected type: {message}")]
    TypeMismatch {
        /// The JSON path that was read.
        path: String,
        /// Deserialization message.
        message: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

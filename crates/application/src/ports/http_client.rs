//! HTTP client port

use std::future::Future;

use restcheck_domain::{request::RequestSpec, response::ResponseSpec};
use thiserror::Error;

/// Transport-level failures. The response never arrived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// No response within the request timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that was exceeded.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying cause.
        message: String,
    },

    /// The remote end refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Remote host.
        host: String,
        /// Remote port.
        port: u16,
    },

    /// Any other connection failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was reached.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Configured limit.
        max: usize,
    },

    /// The URL could not be used.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Anything else reported by the client library.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the harness logic to be independent of specific HTTP libraries.
pub trait HttpClient: Send + Sync {
    /// Sends `request` once and returns the response.
    ///
    /// Implementations must send basic credentials preemptively and must
    /// not retry.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received.
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send;
}

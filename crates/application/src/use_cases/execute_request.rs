//! Execute Request Use Case
//!
//! Validates a request, sends it once through the `HttpClient` port and
//! logs the exchange.

use std::sync::Arc;

use restcheck_domain::{request::RequestSpec, response::ResponseSpec};
use tracing::{debug, info, warn};

use crate::error::HarnessResult;
use crate::ports::HttpClient;

/// Use case for executing HTTP requests.
///
/// # Example
///
/// ```ignore
/// let client = ReqwestHttpClient::new(30_000, "restcheck")?;
/// let use_case = ExecuteRequest::new(Arc::new(client));
///
/// let request = RequestSpec::get("http://md5.jsontest.com").query_param("text", "test");
/// let response = use_case.execute(&request).await?;
/// ```
pub struct ExecuteRequest<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> ExecuteRequest<C> {
    /// Creates a new `ExecuteRequest` use case with the given HTTP client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Executes the request and returns the response.
    ///
    /// The request is validated first, so an unresolved path placeholder
    /// fails without touching the network. Network failures are returned as
    /// they are; nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` on validation failures and
    /// `HarnessError::Network` when no response arrives.
    pub async fn execute(&self, request: &RequestSpec) -> HarnessResult<ResponseSpec> {
        let url = request.validate()?;

        debug!(
            method = %request.method,
            url = %url,
            headers = request.headers.len(),
            basic_auth = request.auth.is_some(),
            body = request.body.is_some(),
            "sending request"
        );

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(method = %request.method, url = %url, error = %e, "request failed");
                return Err(e.into());
            }
        };

        info!(
            method = %request.method,
            url = %url,
            status = response.status(),
            elapsed_ms = u64::try_from(response.duration().as_millis()).unwrap_or(u64::MAX),
            "received response"
        );

        Ok(response)
    }
}

impl<C: HttpClient> Clone for ExecuteRequest<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

//! Everything a test needs to send requests and check responses.

use std::sync::Arc;
use std::time::Duration;

use restcheck_application::{DataDrivenRunner, ExecuteRequest, HarnessError, HarnessResult};
use restcheck_domain::{RequestSpec, ResponseExpectation, ResponseSpec, TestResults};
use restcheck_infrastructure::{HarnessConfig, ReqwestHttpClient, TestRunner, init_tracing};
use tracing::info;

use crate::endpoints::Endpoints;

/// Executor, assertion runner, configuration and endpoints in one place.
///
/// Cloning is cheap; data-driven bodies take their own clone.
#[derive(Clone)]
pub struct Harness {
    executor: ExecuteRequest<ReqwestHttpClient>,
    runner: TestRunner,
    config: Arc<HarnessConfig>,
    endpoints: Endpoints,
}

impl Harness {
    /// Initializes logging and builds a harness from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Setup` if the configuration is invalid or the
    /// HTTP client cannot be created.
    pub fn from_env() -> HarnessResult<Self> {
        init_tracing();
        let config = HarnessConfig::load().map_err(|e| HarnessError::Setup(e.to_string()))?;
        Self::new(config)
    }

    /// Builds a harness from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Setup` if the HTTP client cannot be created.
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        let client = ReqwestHttpClient::new(config.timeout_ms, &config.user_agent)
            .map_err(|e| HarnessError::Setup(e.to_string()))?;
        info!(timeout_ms = config.timeout_ms, "harness ready");

        Ok(Self {
            executor: ExecuteRequest::new(Arc::new(client)),
            runner: TestRunner::new(),
            endpoints: Endpoints::from_config(&config),
            config: Arc::new(config),
        })
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Request constructors for the services under test.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Sends one request.
    ///
    /// # Errors
    ///
    /// `Config` for an unusable request, `Network` when no response arrives.
    pub async fn send(&self, request: &RequestSpec) -> HarnessResult<ResponseSpec> {
        self.executor.execute(request).await
    }

    /// Checks a response against an expectation.
    ///
    /// # Errors
    ///
    /// `Assertion` listing every mismatch.
    pub fn verify(
        &self,
        expectation: &ResponseExpectation,
        response: &ResponseSpec,
    ) -> HarnessResult<TestResults> {
        Ok(self.runner.verify(expectation, response)?)
    }

    /// Sends a request and checks the response, returning it for further checks.
    ///
    /// # Errors
    ///
    /// Any error of [`Harness::send`] or [`Harness::verify`].
    pub async fn send_and_verify(
        &self,
        request: &RequestSpec,
        expectation: &ResponseExpectation,
    ) -> HarnessResult<ResponseSpec> {
        let response = self.send(request).await?;
        self.verify(expectation, &response)?;
        Ok(response)
    }

    /// A data-driven runner bounding each case by the configured timeout.
    #[must_use]
    pub fn data_driven(&self, suite: &str) -> DataDrivenRunner {
        DataDrivenRunner::new(suite, Duration::from_millis(self.config.timeout_ms))
    }
}

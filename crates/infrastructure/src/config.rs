//! Harness configuration.
//!
//! Built with the `config` crate from compiled-in defaults, overridden by
//! `RESTCHECK_*` environment variables. Credentials and the secured endpoint
//! have no defaults; they only ever come from the environment.

use std::collections::HashMap;
use std::fmt;

use ::config::{Config, Environment};
use restcheck_domain::BasicCredentials;
use serde::Deserialize;
use thiserror::Error;

/// Prefix of every environment variable read by [`HarnessConfig::load`].
pub const ENV_PREFIX: &str = "RESTCHECK";

/// Errors from loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A value was read but cannot be used.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings shared by every test of the suite.
#[derive(Clone, Deserialize)]
pub struct HarnessConfig {
    /// Bound on every request and on every data-driven case.
    pub timeout_ms: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Weather-by-city service, the city is appended as a path segment.
    pub weather_url: String,
    /// Ergast F1 API root.
    pub ergast_url: String,
    /// MD5 hashing service.
    pub md5_url: String,
    /// Customer registration endpoint.
    pub registration_url: String,
    /// Basic-auth secured endpoint.
    #[serde(default)]
    pub secured_url: Option<String>,
    /// Basic-auth user name.
    #[serde(default)]
    pub basic_username: Option<String>,
    /// Basic-auth password.
    #[serde(default)]
    pub basic_password: Option<String>,
}

impl HarnessConfig {
    /// Loads defaults overridden by the process environment.
    ///
    /// # Errors
    ///
    /// Fails if a variable has the wrong type or the timeout is zero.
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::build(Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads defaults overridden by `vars` instead of the process
    /// environment. Keys use the same `RESTCHECK_*` names.
    ///
    /// # Errors
    ///
    /// Same as [`HarnessConfig::load`].
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigLoadError> {
        Self::build(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn build(environment: Environment) -> Result<Self, ConfigLoadError> {
        let config: Self = Config::builder()
            .set_default("timeout_ms", 30_000)?
            .set_default("user_agent", concat!("restcheck/", env!("CARGO_PKG_VERSION")))?
            .set_default("weather_url", "http://restapi.demoqa.com/utilities/weather/city")?
            .set_default("ergast_url", "http://ergast.com/api/f1")?
            .set_default("md5_url", "http://md5.jsontest.com")?
            .set_default("registration_url", "http://restapi.demoqa.com/customer/register")?
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        if config.timeout_ms == 0 {
            return Err(ConfigLoadError::Invalid(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Returns basic-auth credentials when both halves are configured.
    #[must_use]
    pub fn basic_credentials(&self) -> Option<BasicCredentials> {
        match (non_empty(&self.basic_username), non_empty(&self.basic_password)) {
            (Some(username), Some(password)) => Some(BasicCredentials::new(username, password)),
            _ => None,
        }
    }

    /// Returns the secured endpoint URL when configured.
    #[must_use]
    pub fn secured_url(&self) -> Option<&str> {
        non_empty(&self.secured_url)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("weather_url", &self.weather_url)
            .field("ergast_url", &self.ergast_url)
            .field("md5_url", &self.md5_url)
            .field("registration_url", &self.registration_url)
            .field("secured_url", &self.secured_url)
            .field("basic_username", &self.basic_username)
            .field("basic_password", &self.basic_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

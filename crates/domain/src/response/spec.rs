//! Response specification type
//!
//! Contains types for representing HTTP responses including
//! status codes, headers, body, and timing information.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::json_path::JsonPath;

/// HTTP response as received.
///
/// Immutable once built: the fields are private so the JSON view of the
/// body, parsed on first use and cached, always matches the body.
#[derive(Debug, Clone)]
pub struct ResponseSpec {
    status: u16,
    headers: HashMap<String, String>,
    body: String,
    duration: Duration,
    parsed: OnceLock<Result<Value, String>>,
}

impl ResponseSpec {
    /// Creates a new `ResponseSpec` from raw response data.
    ///
    /// Invalid UTF-8 in the body is replaced, not rejected.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        let body = String::from_utf8(body)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());

        Self {
            status,
            headers,
            body,
            duration,
            parsed: OnceLock::new(),
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns true for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Response headers as received.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Response body as text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Time from sending the request to reading the whole body.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBody`] if the body is not JSON.
    pub fn json(&self) -> DomainResult<&Value> {
        self.parsed
            .get_or_init(|| serde_json::from_str(&self.body).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|message| DomainError::InvalidBody(message.clone()))
    }

    /// Selects a value from the JSON body.
    ///
    /// Returns `Ok(None)` when the path selects nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON.
    pub fn select(&self, path: &JsonPath) -> DomainResult<Option<Value>> {
        Ok(path.select(self.json()?))
    }

    /// Reads the value at `path` and deserializes it.
    ///
    /// Used to chain scenarios, e.g. feeding the first circuit id of one
    /// response into the next request.
    ///
    /// # Errors
    ///
    /// Fails if the path is invalid, the body is not JSON, nothing is found,
    /// or the value has the wrong type.
    pub fn extract<T: DeserializeOwned>(&self, path: &str) -> DomainResult<T> {
        let json_path = JsonPath::parse(path)?;
        let value = self
            .select(&json_path)?
            .ok_or_else(|| DomainError::PathNotFound(path.to_string()))?;
        serde_json::from_value(value).map_err(|e| DomainError::TypeMismatch {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

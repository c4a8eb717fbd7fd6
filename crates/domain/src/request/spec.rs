//! Request specification type
//!
//! A [`RequestSpec`] carries everything needed to issue one HTTP call: the
//! base URL, a path template with `{placeholders}`, parameters, headers,
//! optional basic credentials and an optional JSON body. Specs are built
//! fresh for every test; there is no shared base URL.

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use super::{BasicCredentials, HttpMethod, Params};
use crate::error::{DomainError, DomainResult};

/// The JSON media type.
pub const APPLICATION_JSON: &str = "application/json";

/// Complete specification of an HTTP request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: HttpMethod,
    /// Scheme, host and optional base path, e.g. `http://ergast.com/api/f1`.
    pub base_url: String,
    /// Path template appended to the base URL, e.g. `/{season}/circuits.json`.
    pub path: String,
    /// Values substituted for `{name}` placeholders in the path.
    pub path_params: BTreeMap<String, String>,
    /// Query string parameters.
    pub query_params: Params,
    /// Request headers.
    pub headers: Params,
    /// Preemptive basic authentication.
    pub auth: Option<BasicCredentials>,
    /// JSON request body.
    pub body: Option<serde_json::Value>,
    /// Per-request timeout; the client default applies when unset.
    pub timeout_ms: Option<u64>,
}

impl RequestSpec {
    /// Creates a request for `method` against `base_url`.
    #[must_use]
    pub fn new(method: HttpMethod, base_url: impl Into<String>) -> Self {
        Self {
            method,
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(base_url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, base_url)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(base_url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, base_url)
    }

    /// Sets the method, keeping everything else.
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the path template.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Binds a value to the `{name}` placeholder.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.set(name, value);
        self
    }

    /// Sets a header, replacing any header with the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set_ignore_case(name, value);
        self
    }

    /// Sets the `Accept` header.
    #[must_use]
    pub fn accept(self, media_type: &str) -> Self {
        self.header("Accept", media_type)
    }

    /// Sets the `Content-Type` header.
    #[must_use]
    pub fn content_type(self, media_type: &str) -> Self {
        self.header("Content-Type", media_type)
    }

    /// Enables preemptive basic authentication.
    #[must_use]
    pub fn basic_auth(mut self, credentials: BasicCredentials) -> Self {
        self.auth = Some(credentials);
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` and sets it as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBody`] if `body` cannot be serialized.
    pub fn json_body<T: Serialize>(self, body: &T) -> DomainResult<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        Ok(self.json(value))
    }

    /// Sets a per-request timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Returns the path segments with every placeholder substituted.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnresolvedPathParam`] naming the first
    /// placeholder without a value.
    pub fn resolved_segments(&self) -> DomainResult<Vec<String>> {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| self.substitute(segment))
            .collect()
    }

    fn substitute(&self, segment: &str) -> DomainResult<String> {
        let mut out = String::with_capacity(segment.len());
        let mut rest = segment;
        while let Some(open) = rest.find('{') {
            let Some(len) = rest[open..].find('}') else {
                break;
            };
            let name = &rest[open + 1..open + len];
            let value = self
                .path_params
                .get(name)
                .ok_or_else(|| DomainError::UnresolvedPathParam(name.to_string()))?;
            out.push_str(&rest[..open]);
            out.push_str(value);
            rest = &rest[open + len + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Builds the final URL: base URL, substituted path, query string.
    ///
    /// Path parameter values are percent-encoded as single segments.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] for an empty, unparsable or
    /// non-http(s) base URL, and [`DomainError::UnresolvedPathParam`] for a
    /// placeholder without a value.
    pub fn full_url(&self) -> DomainResult<Url> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(DomainError::InvalidUrl("URL is required".to_string()));
        }

        let mut url =
            Url::parse(base).map_err(|e| DomainError::InvalidUrl(format!("{e}: {base}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "URL must start with http:// or https://: {base}"
            )));
        }

        let segments = self.resolved_segments()?;
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| DomainError::InvalidUrl(format!("URL cannot have a path: {base}")))?
                .pop_if_empty()
                .extend(segments.iter());
        }

        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query_params.iter() {
                pairs.append_pair(&param.name, &param.value);
            }
        }

        Ok(url)
    }

    /// Checks the request can be sent and returns its final URL.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: an unusable URL, an unresolved
    /// placeholder or a header name that is not an HTTP token.
    pub fn validate(&self) -> DomainResult<Url> {
        let url = self.full_url()?;
        if let Some(bad) = self.headers.iter().find(|h| !is_token(&h.name)) {
            return Err(DomainError::InvalidHeaderName(bad.name.clone()));
        }
        Ok(url)
    }
}

fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! Every call to the system under test goes through it.

use std::collections::HashMap;
use std::error::Error as _;
use std::time::{Duration, Instant};

use reqwest::{Client, Method};
use restcheck_application::ports::{HttpClient, HttpClientError};
use restcheck_domain::{
    request::{APPLICATION_JSON, HttpMethod, RequestSpec},
    response::ResponseSpec,
};

/// Redirects followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
///
/// Wraps a `reqwest::Client` and implements the `HttpClient` port from the
/// application layer. Requests carrying basic credentials get their
/// `Authorization` header up front instead of waiting for a challenge.
pub struct ReqwestHttpClient {
    client: Client,
    default_timeout_ms: u64,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client.
    ///
    /// - Requests without their own timeout use `default_timeout_ms`.
    /// - Redirects are followed up to 10 times.
    /// - TLS verification is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(default_timeout_ms: u64, user_agent: &str) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self {
            client,
            default_timeout_ms,
        })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
        }
    }

    /// Encodes the JSON body, adding `Content-Type` unless the request set one.
    fn build_body(
        builder: reqwest::RequestBuilder,
        request: &RequestSpec,
    ) -> Result<reqwest::RequestBuilder, HttpClientError> {
        let Some(body) = &request.body else {
            return Ok(builder);
        };

        let bytes = serde_json::to_vec(body)
            .map_err(|e| HttpClientError::InvalidBody(format!("Invalid JSON: {e}")))?;

        let builder = if request.headers.get_ignore_case("content-type").is_some() {
            builder
        } else {
            builder.header("Content-Type", APPLICATION_JSON)
        };
        Ok(builder.body(bytes))
    }

    /// Maps reqwest errors to domain `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = describe(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        HttpClientError::Other(describe(error))
    }
}

/// Renders an error with its whole source chain.
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        let url = request
            .full_url()
            .map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;
        let timeout_ms = request.timeout_ms.unwrap_or(self.default_timeout_ms);

        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(Duration::from_millis(timeout_ms));

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        if let Some(credentials) = &request.auth {
            builder = builder.header("Authorization", credentials.authorization_header());
        }

        builder = Self::build_body(builder, request)?;

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();

        let response_headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?
            .to_vec();

        Ok(ResponseSpec::new(
            status,
            response_headers,
            body_bytes,
            start.elapsed(),
        ))
    }
}

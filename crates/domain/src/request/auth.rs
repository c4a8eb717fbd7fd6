//! Basic authentication credentials

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Username and password for HTTP basic authentication.
///
/// Credentials are always sent preemptively: the `Authorization` header is
/// attached to the first request instead of waiting for a `401` challenge.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

impl BasicCredentials {
    /// Creates a new set of credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the `Authorization` header value, e.g. `Basic dXNlcjpwYXNz`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

// Passwords never reach logs.
impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

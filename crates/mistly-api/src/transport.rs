// Shared transport configuration for building reqwest::Client instances.
//
// The Mist cloud authenticates every request with an
// `Authorization: Token <key>` header, so the header set is baked into
// the client at construction time rather than applied per request.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with the given default headers.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("mistly/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Build a client carrying the Mist token auth header.
    pub fn build_token_client(&self, token: &SecretString) -> Result<reqwest::Client, Error> {
        let value = format!("Token {}", token.expose_secret());
        let mut header = HeaderValue::from_str(&value).map_err(|_| Error::Authentication {
            message: "API token contains characters not valid in an HTTP header".into(),
        })?;
        header.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header);
        self.build_client_with_headers(headers)
    }
}

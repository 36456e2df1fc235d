//! HTTP transport seam between the issuer and Vault.
//!
//! The issuer only ever POSTs JSON and inspects status, reason, and body, so
//! the trait is kept that narrow. `ReqwestTransport` is the production
//! implementation; tests substitute a recording double.

use std::fmt;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::VaultConfig;
use crate::error::ConfigError;

/// Header carrying the caller token.
pub const TOKEN_HEADER: &str = "X-Vault-Token";
/// Header selecting a Vault Enterprise namespace.
pub const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

/// An outgoing JSON POST.
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// Header values include tokens.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("headers", &names)
            .finish_non_exhaustive()
    }
}

/// A response as seen by the issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase accompanying the status, possibly empty.
    ///
    /// `ReqwestTransport` fills this with the standard phrase for the status
    /// code, not the phrase the server sent. Unregistered codes leave it empty.
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON. A body that does not decode counts as a
    /// malformed response, i.e. a transport failure.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body)
            .map_err(|e| TransportError::new(format!("malformed response from vault: {e}")))
    }

    /// The reason phrase, or a generic message naming the status when the
    /// server sent none.
    pub fn reason_or_status(&self) -> String {
        if self.reason.trim().is_empty() {
            format!("vault request failed with status {}", self.status)
        } else {
            self.reason.clone()
        }
    }
}

/// Connection, timeout, or decoding failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Blocking JSON POST transport.
pub trait Transport: Send + Sync {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a blocking reqwest client.
///
/// The configured timeout applies to every request sent through it.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &VaultConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder().timeout(config.timeout());
        if !config.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .map_err(|e| TransportError::new(e.to_string()))?;
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = response
            .text()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

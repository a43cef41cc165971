//! HTTP transport for hub requests.
//!
//! A transport performs exactly one POST per call and hands back the parsed
//! JSON body. It never inspects the payload; validation is the envelope
//! codec's job. The HTTP status is not treated as an error on its own because
//! error bodies (`status`/`title`) arrive with non-2xx codes.

use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use super::envelope::RequestEnvelope;
use crate::constants;
use crate::error::TransportError;

/// Sends a request envelope and returns the raw JSON response.
///
/// Implementations must be stateless across calls so one instance can serve
/// concurrent callers.
pub trait Transport: Send + Sync {
    /// Posts `envelope` to `url` once.
    fn post(&self, url: &str, envelope: &RequestEnvelope<'_>) -> Result<Value, TransportError>;
}

/// Blocking reqwest transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the default request timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(constants::HTTP_REQUEST_TIMEOUT)
    }

    /// Creates a transport whose requests fail after `timeout`.
    ///
    /// # Errors
    ///
    /// [`TransportError::InvalidTimeout`] if `timeout` is zero or longer than
    /// [`constants::MAX_HTTP_REQUEST_TIMEOUT`].
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        if timeout.is_zero() || timeout > constants::MAX_HTTP_REQUEST_TIMEOUT {
            return Err(TransportError::InvalidTimeout(timeout));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client })
    }

    /// Wraps a pre-configured HTTP client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, envelope: &RequestEnvelope<'_>) -> Result<Value, TransportError> {
        log::debug!("POST {} action={:?}", url, envelope.action());

        let response = self
            .client
            .post(url)
            .json(envelope)
            .send()
            .map_err(|source| TransportError::Send {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| TransportError::Send {
            url: url.to_string(),
            source,
        })?;
        log::trace!("response {}: {}", status, body);

        serde_json::from_str(&body).map_err(|source| TransportError::InvalidBody {
            url: url.to_string(),
            status: status.as_u16(),
            source,
        })
    }
}

//! Action client for the competition hub.
//!
//! [`HubClient`] exposes one method per protocol action. Each call builds a
//! fresh envelope, sends it once, and routes the body through
//! [`decode_envelope`] before interpreting it.

use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use super::envelope::{decode_envelope, RequestEnvelope, ResponseEnvelope};
use super::transport::{HttpTransport, Transport};
use super::types::{ConnectionInfo, Request};
use crate::catalog::{self, Episode, Item};
use crate::error::{HubError, Result};

/// Client for the hub's robot API.
///
/// Holds no connection state of its own; the endpoint and identity come from
/// the [`ConnectionInfo`] passed to each call.
#[derive(Debug, Clone)]
pub struct HubClient<T = HttpTransport> {
    transport: T,
}

impl HubClient<HttpTransport> {
    /// Creates a client backed by [`HttpTransport`] with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }

    /// Creates a client whose requests fail after `timeout`.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-request deadline, non-zero and at most
    ///   [`MAX_HTTP_REQUEST_TIMEOUT`](crate::constants::MAX_HTTP_REQUEST_TIMEOUT)
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidTimeout`](crate::TransportError::InvalidTimeout)
    /// for an out-of-range `timeout`, or an error if the HTTP client cannot be
    /// created.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::with_timeout(timeout)?))
    }
}

impl<T: Transport> HubClient<T> {
    /// Creates a client over a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Sends `request` and returns the validated envelope.
    ///
    /// # Arguments
    ///
    /// * `conn` - Hub endpoint and robot identity
    /// * `request` - Action and its parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails in transit, the body is not JSON,
    /// the hub answers with a `status`/`title` error, or the body carries
    /// neither shape.
    pub fn send(&self, conn: &ConnectionInfo, request: &Request) -> Result<ResponseEnvelope> {
        let envelope = RequestEnvelope::for_request(conn, request);
        let raw = self.transport.post(conn.url(), &envelope)?;
        decode_envelope(raw)
    }

    fn send_flag(&self, conn: &ConnectionInfo, request: &Request) -> Result<bool> {
        let response = self.send(conn, request)?;
        log::debug!("{} -> success={}", request.action(), response.success());
        Ok(response.success())
    }

    /// Informs the hub the robot is active.
    ///
    /// # Returns
    ///
    /// The hub's `success` flag.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub fn ping(&self, conn: &ConnectionInfo) -> Result<bool> {
        self.send_flag(conn, &Request::Ping)
    }

    /// Reports that the robot started `episode`.
    ///
    /// # Arguments
    ///
    /// * `conn` - Hub endpoint and robot identity
    /// * `episode` - Episode number
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub fn start_episode(&self, conn: &ConnectionInfo, episode: u32) -> Result<bool> {
        self.send_flag(conn, &Request::StartEpisode { episode })
    }

    /// Reports that the robot stopped `episode`.
    ///
    /// # Arguments
    ///
    /// * `conn` - Hub endpoint and robot identity
    /// * `episode` - Episode number
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub fn stop_episode(&self, conn: &ConnectionInfo, episode: u32) -> Result<bool> {
        self.send_flag(conn, &Request::StopEpisode { episode })
    }

    /// Reports that the robot started `phase` of `episode`.
    ///
    /// # Arguments
    ///
    /// * `conn` - Hub endpoint and robot identity
    /// * `episode` - Episode number
    /// * `phase` - Phase number within the episode
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub fn start_phase(&self, conn: &ConnectionInfo, episode: u32, phase: u32) -> Result<bool> {
        self.send_flag(conn, &Request::StartPhase { episode, phase })
    }

    /// Reports that the robot stopped `phase` of `episode`.
    ///
    /// # Arguments
    ///
    /// * `conn` - Hub endpoint and robot identity
    /// * `episode` - Episode number
    /// * `phase` - Phase number within the episode
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub fn stop_phase(&self, conn: &ConnectionInfo, episode: u32, phase: u32) -> Result<bool> {
        self.send_flag(conn, &Request::StopPhase { episode, phase })
    }

    /// Sends a free-form message for `phase` of `episode`.
    ///
    /// # Arguments
    ///
    /// * `conn` - Hub endpoint and robot identity
    /// * `episode` - Episode number
    /// * `phase` - Phase number within the episode
    /// * `message` - Text forwarded to the referees as-is
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub fn info(
        &self,
        conn: &ConnectionInfo,
        episode: u32,
        phase: u32,
        message: &str,
    ) -> Result<bool> {
        self.send_flag(
            conn,
            &Request::Info {
                episode,
                phase,
                message: message.to_string(),
            },
        )
    }

    /// Fetches the raw episode list.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::QueryFailed`] when the hub answers `success: false`,
    /// a malformed-data error when the `episodes` list is missing, or any
    /// error from [`send`](Self::send).
    pub fn list_episodes(&self, conn: &ConnectionInfo) -> Result<Vec<Value>> {
        let response = self.send(conn, &Request::Episodes)?;
        if response.success() {
            return response.into_episodes();
        }
        Err(HubError::QueryFailed {
            message: response.into_message(),
        })
    }

    /// Fetches the raw item list for a phase.
    ///
    /// A `success: false` answer yields an empty list rather than an error.
    ///
    /// # Arguments
    ///
    /// * `conn` - Hub endpoint and robot identity
    /// * `episode` - Episode number
    /// * `phase` - Phase number within the episode
    ///
    /// # Errors
    ///
    /// Returns a malformed-data error when a successful answer lacks the
    /// `items` list, or any error from [`send`](Self::send).
    pub fn list_items(
        &self,
        conn: &ConnectionInfo,
        episode: u32,
        phase: u32,
    ) -> Result<Vec<Value>> {
        let response = self.send(conn, &Request::Items { episode, phase })?;
        if response.success() {
            return response.into_items();
        }
        log::debug!(
            "ITEMS for episode {} phase {} unsuccessful ({:?}); returning no items",
            episode,
            phase,
            response.message()
        );
        Ok(Vec::new())
    }

    /// Fetches and materializes the episode catalog.
    ///
    /// # Errors
    ///
    /// Any error from [`list_episodes`](Self::list_episodes), plus
    /// malformed-data and duplicate errors from the catalog.
    pub fn episodes(&self, conn: &ConnectionInfo) -> Result<BTreeMap<u32, Episode>> {
        catalog::parse_episodes(&self.list_episodes(conn)?)
    }

    /// Fetches and materializes the item catalog for a phase.
    ///
    /// # Arguments
    ///
    /// * `conn` - Hub endpoint and robot identity
    /// * `episode` - Episode number
    /// * `phase` - Phase number within the episode
    ///
    /// # Errors
    ///
    /// Any error from [`list_items`](Self::list_items), plus malformed-data
    /// errors and [`HubError::DuplicateItem`] from the catalog.
    pub fn items(
        &self,
        conn: &ConnectionInfo,
        episode: u32,
        phase: u32,
    ) -> Result<BTreeMap<String, Item>> {
        catalog::parse_items(&self.list_items(conn, episode, phase)?)
    }
}

//! Error types for hub communication.
//!
//! Every failure in the library surfaces as a [`HubError`]. Nothing is retried
//! or swallowed: each action is a single round trip and the first failure is
//! returned to the caller.

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, HubError>;

/// Failures of the HTTP round trip itself.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The requested timeout is zero or above `MAX_HTTP_REQUEST_TIMEOUT`.
    #[error(
        "invalid request timeout {0:?}: must be non-zero and at most {max:?}",
        max = crate::constants::MAX_HTTP_REQUEST_TIMEOUT
    )]
    InvalidTimeout(std::time::Duration),

    /// Connection failure, timeout, or an unreadable response body.
    #[error("request to {url} failed: {source}")]
    Send {
        /// Endpoint the request was sent to.
        url: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but the body is not JSON.
    #[error("response from {url} (HTTP {status}) is not valid JSON: {source}")]
    InvalidBody {
        /// Endpoint the request was sent to.
        url: String,
        /// HTTP status code of the response.
        status: u16,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    /// Returns `true` if the request failed because it ran out of time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Send { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

/// Errors returned by the hub client and the catalog materializer.
#[derive(Error, Debug)]
pub enum HubError {
    /// The HTTP round trip failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The hub (or the framework in front of it) returned a `status`/`title` error shape.
    #[error("unexpected response: status={status}, msg={title}")]
    Protocol {
        /// Value of the `status` field, rendered as text.
        status: String,
        /// Value of the `title` field, `<empty>` when absent.
        title: String,
    },

    /// The response carried neither a `success` nor a `status` field.
    #[error("unexpected response: {0}")]
    UnrecognizedResponse(serde_json::Value),

    /// The EPISODES query was answered with `success: false`.
    #[error("failed to query for episodes{}", detail(.message.as_deref()))]
    QueryFailed {
        /// Optional explanation from the hub.
        message: Option<String>,
    },

    /// A required field is missing from nested catalog data, or has the wrong type.
    #[error("{entity} data {problem} '{field}'")]
    MalformedData {
        /// Kind of record being parsed (`episode`, `phase`, `item`, `response`).
        entity: &'static str,
        /// Name of the offending field.
        field: &'static str,
        /// Short description, e.g. `missing required key`.
        problem: &'static str,
    },

    /// Two phases of the same episode share a number.
    #[error("phase '{phase} ({name})' already added to episode {episode}")]
    DuplicatePhase {
        /// Episode the phase belongs to.
        episode: u32,
        /// Repeated phase number.
        phase: u32,
        /// Name of the rejected phase.
        name: String,
    },

    /// Two episodes share a number.
    #[error("duplicate episode: {0}")]
    DuplicateEpisode(u32),

    /// Two items share a code.
    #[error("duplicate item: {0}")]
    DuplicateItem(String),
}

fn detail(message: Option<&str>) -> String {
    message
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

impl HubError {
    pub(crate) fn missing(entity: &'static str, field: &'static str) -> Self {
        Self::MalformedData {
            entity,
            field,
            problem: "missing required key",
        }
    }

    pub(crate) fn wrong_type(entity: &'static str, field: &'static str) -> Self {
        Self::MalformedData {
            entity,
            field,
            problem: "has invalid value for key",
        }
    }

    /// Returns `true` for errors raised before a valid JSON body was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_failed_message_formatting() {
        let err = HubError::QueryFailed {
            message: Some("no data".to_string()),
        };
        assert_eq!(err.to_string(), "failed to query for episodes (no data)");

        let err = HubError::QueryFailed { message: None };
        assert_eq!(err.to_string(), "failed to query for episodes");
    }

    #[test]
    fn test_malformed_data_names_field() {
        let err = HubError::missing("item", "location");
        assert_eq!(err.to_string(), "item data missing required key 'location'");
    }

    #[test]
    fn test_protocol_error_display() {
        let err = HubError::Protocol {
            status: "404".to_string(),
            title: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected response: status=404, msg=Not Found");
        assert!(!err.is_transport());
    }
}

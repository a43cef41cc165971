//! Application-wide constants for erl-comm.
//!
//! Wire field names live next to the types that serialize them; this module
//! holds defaults and environment variable names.

use std::time::Duration;

// ============================================================================
// Timeouts
// ============================================================================

/// HTTP client request timeout for hub calls.
///
/// Applies to the whole round trip (connect, send, read body). A robot that
/// loses connectivity gets a `TransportError` instead of hanging forever.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound accepted for the request timeout.
///
/// A hub call that has not answered in five minutes is dead, and much larger
/// values overflow reqwest's deadline arithmetic.
pub const MAX_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

// ============================================================================
// Hub defaults
// ============================================================================

/// Default hub endpoint.
pub const DEFAULT_HUB_URL: &str = "https://ecs-mnemosyne.azurewebsites.net/api/Hub";

/// Default competition identifier.
pub const DEFAULT_COMPETITION: &str = "ERL";

/// Title reported for a `status` error response that carries no `title`.
pub const EMPTY_TITLE: &str = "<empty>";

// ============================================================================
// Environment
// ============================================================================

/// Overrides the configuration directory.
pub const ENV_CONFIG_DIR: &str = "ERL_COMM_CONFIG_DIR";
/// Overrides the hub endpoint URL.
pub const ENV_HUB_URL: &str = "ERL_HUB_URL";
/// Overrides the robot identifier.
pub const ENV_ROBOT_ID: &str = "ERL_ROBOT_ID";
/// Overrides the competition identifier.
pub const ENV_COMPETITION: &str = "ERL_COMPETITION";
/// Overrides the request timeout, in seconds.
pub const ENV_HTTP_TIMEOUT: &str = "ERL_HTTP_TIMEOUT";
/// Redirects CLI log output to a file.
pub const ENV_LOG_FILE: &str = "ERL_COMM_LOG_FILE";

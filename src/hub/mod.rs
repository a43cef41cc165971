//! Hub communication module.
//!
//! - [`types`] - Connection identity, action tags, per-action requests
//! - [`envelope`] - Request envelope encoding and response validation
//! - [`transport`] - Blocking HTTP POST of a JSON envelope
//! - [`client`] - One operation per hub action
//!
//! # Flow
//!
//! ```text
//! HubClient ──► RequestEnvelope ──► Transport ──► decode_envelope
//!           ──► bool / raw list / catalog
//! ```

pub mod client;
pub mod envelope;
pub mod transport;
pub mod types;

pub use client::HubClient;
pub use envelope::{decode_envelope, RequestEnvelope, ResponseEnvelope};
pub use transport::{HttpTransport, Transport};
pub use types::{Action, ConnectionInfo, Request};

//! ERL Comm - client for the competition hub robot API.
//!
//! A robot uses this crate to report lifecycle events (episode and phase
//! start/stop, informational messages) to the hub and to fetch the episode
//! catalog and per-phase item lists.
//!
//! # Architecture
//!
//! - **Transport** - one blocking JSON POST per call, no retries
//! - **Envelope** - request encoding and the single response validation point
//! - **Client** - one method per hub action
//! - **Catalog** - validated episode/phase and item maps
//!
//! # Modules
//!
//! - [`hub`] - Protocol types, envelopes, transport and client
//! - [`catalog`] - Episode, phase and item materialization
//! - [`config`] - Configuration loading/saving
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```no_run
//! use erl_comm::{ConnectionInfo, HubClient};
//!
//! # fn main() -> erl_comm::Result<()> {
//! let conn = ConnectionInfo::new("https://hub.example.com/api/Hub", "robot-id", "ERL");
//! let client = HubClient::new()?;
//!
//! if client.ping(&conn)? {
//!     client.start_episode(&conn, 4)?;
//!     for episode in client.episodes(&conn)?.values() {
//!         println!("{episode}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod hub;

// Re-export commonly used types
pub use catalog::{parse_episodes, parse_items, Episode, Item, Phase};
pub use config::Config;
pub use error::{HubError, Result, TransportError};
pub use hub::{Action, ConnectionInfo, HttpTransport, HubClient, Request, Transport};

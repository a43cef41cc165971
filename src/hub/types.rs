//! Protocol types for the competition hub API.
//!
//! Defines the connection identity, the closed set of actions the hub
//! understands, and the per-action request variants that decide which
//! optional envelope fields are sent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Endpoint and identity used for every hub call.
///
/// Supplied once by the caller and never mutated; safe to share across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    url: String,
    robot_id: String,
    competition_id: String,
}

impl ConnectionInfo {
    /// Creates connection info for the given endpoint and identity.
    pub fn new(
        url: impl Into<String>,
        robot_id: impl Into<String>,
        competition_id: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            robot_id: robot_id.into(),
            competition_id: competition_id.into(),
        }
    }

    /// Hub endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Robot identifier sent as `RobotId`.
    pub fn robot_id(&self) -> &str {
        &self.robot_id
    }

    /// Competition identifier sent as `Competition`.
    pub fn competition_id(&self) -> &str {
        &self.competition_id
    }
}

/// Action tags defined by the hub protocol (Robot API Guide 1.0.1a).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Informs the hub the robot is active.
    #[serde(rename = "PING")]
    Ping,
    /// Lists episodes and their phases.
    #[serde(rename = "EPISODES")]
    Episodes,
    /// Lists items for an episode phase.
    #[serde(rename = "ITEMS")]
    Items,
    /// The robot has started an episode.
    #[serde(rename = "STARTEPISODE")]
    StartEpisode,
    /// The robot has stopped or completed an episode.
    #[serde(rename = "STOPEPISODE")]
    StopEpisode,
    /// The robot has started a phase.
    #[serde(rename = "STARTPHASE")]
    StartPhase,
    /// The robot has stopped a phase.
    #[serde(rename = "STOPPHASE")]
    StopPhase,
    /// A general message from the robot.
    #[serde(rename = "INFO")]
    Info,
}

impl Action {
    /// Every action, in protocol order.
    pub const ALL: [Action; 8] = [
        Action::Ping,
        Action::Episodes,
        Action::Items,
        Action::StartEpisode,
        Action::StopEpisode,
        Action::StartPhase,
        Action::StopPhase,
        Action::Info,
    ];

    /// Wire string for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Ping => "PING",
            Action::Episodes => "EPISODES",
            Action::Items => "ITEMS",
            Action::StartEpisode => "STARTEPISODE",
            Action::StopEpisode => "STOPEPISODE",
            Action::StartPhase => "STARTPHASE",
            Action::StopPhase => "STOPPHASE",
            Action::Info => "INFO",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single hub request, carrying exactly the fields its action needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `PING`
    Ping,
    /// `EPISODES`
    Episodes,
    /// `ITEMS` for one phase.
    Items {
        /// Episode number.
        episode: u32,
        /// Phase number.
        phase: u32,
    },
    /// `STARTEPISODE`
    StartEpisode {
        /// Episode number.
        episode: u32,
    },
    /// `STOPEPISODE`
    StopEpisode {
        /// Episode number.
        episode: u32,
    },
    /// `STARTPHASE`
    StartPhase {
        /// Episode number.
        episode: u32,
        /// Phase number.
        phase: u32,
    },
    /// `STOPPHASE`
    StopPhase {
        /// Episode number.
        episode: u32,
        /// Phase number.
        phase: u32,
    },
    /// `INFO`
    Info {
        /// Episode number.
        episode: u32,
        /// Phase number.
        phase: u32,
        /// Free-form message text.
        message: String,
    },
}

impl Request {
    /// Protocol action tag for this request.
    pub fn action(&self) -> Action {
        match self {
            Request::Ping => Action::Ping,
            Request::Episodes => Action::Episodes,
            Request::Items { .. } => Action::Items,
            Request::StartEpisode { .. } => Action::StartEpisode,
            Request::StopEpisode { .. } => Action::StopEpisode,
            Request::StartPhase { .. } => Action::StartPhase,
            Request::StopPhase { .. } => Action::StopPhase,
            Request::Info { .. } => Action::Info,
        }
    }

    /// Episode number, when the action carries one.
    pub fn episode(&self) -> Option<u32> {
        match self {
            Request::Ping | Request::Episodes => None,
            Request::Items { episode, .. }
            | Request::StartEpisode { episode }
            | Request::StopEpisode { episode }
            | Request::StartPhase { episode, .. }
            | Request::StopPhase { episode, .. }
            | Request::Info { episode, .. } => Some(*episode),
        }
    }

    /// Phase number, when the action carries one.
    pub fn phase(&self) -> Option<u32> {
        match self {
            Request::Items { phase, .. }
            | Request::StartPhase { phase, .. }
            | Request::StopPhase { phase, .. }
            | Request::Info { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Message text, only present for `INFO`.
    pub fn message(&self) -> Option<&str> {
        match self {
            Request::Info { message, .. } => Some(message),
            _ => None,
        }
    }
}

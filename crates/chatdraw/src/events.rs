//! What the controller publishes to subscribers.

use std::fmt;

use chatdraw_protocol::ChannelHandle;
use chatdraw_selection::{LastResults, SelectionResult};
use chatdraw_session::SessionState;
use chatdraw_state::{ChatEvent, EngagementMode};
use serde::Serialize;

/// Connection status as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionState {
    /// Maps a protocol session state onto the user-facing one.
    pub fn from_session(state: SessionState) -> Self {
        match state {
            SessionState::Idle | SessionState::Closed => Self::Disconnected,
            SessionState::Connecting => Self::Connecting,
            SessionState::Joined => Self::Connected,
            SessionState::Failed => Self::Error,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One change published on the controller's broadcast channel.
///
/// Collections are sent as full snapshots, so a subscriber can render
/// from any single event without replaying earlier ones.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerEvent {
    ConnectionChanged {
        state: ConnectionState,
        channel: Option<ChannelHandle>,
        /// Set only with [`ConnectionState::Error`].
        error: Option<String>,
    },
    HistoryChanged {
        history: Vec<ChatEvent>,
    },
    ParticipantsChanged {
        participants: Vec<String>,
    },
    WheelChanged {
        entries: Vec<String>,
    },
    Selection {
        result: SelectionResult,
    },
}

/// Everything a front end needs to render from scratch.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    pub channel: Option<ChannelHandle>,
    pub connection: ConnectionState,
    pub mode: EngagementMode,
    /// Keyword the next `start` will latch.
    pub keyword: String,
    pub history: Vec<ChatEvent>,
    /// Most events `history` will hold before dropping the oldest.
    pub history_limit: usize,
    pub participants: Vec<String>,
    pub last_winner: Option<String>,
    pub wheel: Vec<String>,
    pub last_results: LastResults,
}

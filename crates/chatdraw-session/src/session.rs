//! Session types: configuration and the lifecycle state machine.

use std::fmt;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Where and how to log in to the relay.
///
/// The defaults are what the public relay accepts for anonymous,
/// read-only clients.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// IRC-over-WebSocket endpoint.
    ///
    /// Default: `wss://irc-ws.chat.twitch.tv:443`.
    pub relay_url: String,

    /// Placeholder sent with `PASS`. Anonymous logins ignore its value.
    pub password: String,

    /// Guest nicknames are this prefix followed by random digits.
    pub nick_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            relay_url: "wss://irc-ws.chat.twitch.tv:443".to_string(),
            password: "SCHMOOPIIE".to_string(),
            nick_prefix: "justinfan".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The lifecycle state of one protocol session.
///
/// ```text
/// Idle ──→ Connecting ──→ Joined ──→ Closed
///   │          │  │          │
///   │          │  └──────────┴──→ Failed
///   └──────────┴──────────────────→ Closed
/// ```
///
/// `Closed` and `Failed` are terminal: a session never reopens, the
/// owner starts a new one instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Connecting,
    Joined,
    Closed,
    Failed,
}

impl SessionState {
    /// Returns `true` if the session can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            (Idle, Connecting)
                | (Idle, Closed)
                | (Connecting, Joined)
                | (Connecting, Closed)
                | (Connecting, Failed)
                | (Joined, Closed)
                | (Joined, Failed)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Joined => write!(f, "Joined"),
            Self::Closed => write!(f, "Closed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_transition_to_follows_lifecycle() {
        assert!(SessionState::Idle.can_transition_to(SessionState::Connecting));
        assert!(SessionState::Connecting.can_transition_to(SessionState::Joined));
        assert!(SessionState::Joined.can_transition_to(SessionState::Closed));
        assert!(!SessionState::Idle.can_transition_to(SessionState::Joined));
        assert!(!SessionState::Joined.can_transition_to(SessionState::Connecting));
    }

    #[test]
    fn test_failed_reachable_only_from_connecting_or_joined() {
        assert!(SessionState::Connecting.can_transition_to(SessionState::Failed));
        assert!(SessionState::Joined.can_transition_to(SessionState::Failed));
        assert!(!SessionState::Idle.can_transition_to(SessionState::Failed));
        assert!(!SessionState::Closed.can_transition_to(SessionState::Failed));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        use SessionState::*;
        for from in [Closed, Failed] {
            assert!(from.is_terminal());
            for to in [Idle, Connecting, Joined, Closed, Failed] {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_session_config_default_targets_public_relay() {
        let config = SessionConfig::default();
        assert_eq!(config.relay_url, "wss://irc-ws.chat.twitch.tv:443");
        assert_eq!(config.password, "SCHMOOPIIE");
        assert_eq!(config.nick_prefix, "justinfan");
    }
}

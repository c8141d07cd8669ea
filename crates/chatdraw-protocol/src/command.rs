//! Outbound commands.
//!
//! The client is anonymous and read-only, so the full outbound
//! vocabulary is four lines: the handshake trio and the keepalive reply.

use std::fmt;

use crate::ChannelHandle;

/// Server name used in keepalive replies.
pub const RELAY_HOST: &str = "tmi.twitch.tv";

/// A line the client sends to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `PASS <password>`; any placeholder works for anonymous logins.
    Pass(String),
    /// `NICK <nick>`; a `justinfan…` guest nick.
    Nick(String),
    /// `JOIN #<channel>`.
    Join(ChannelHandle),
    /// `PONG :tmi.twitch.tv`, the answer to every `PING`.
    Pong,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass(password) => write!(f, "PASS {password}"),
            Self::Nick(nick) => write!(f, "NICK {nick}"),
            Self::Join(channel) => write!(f, "JOIN #{channel}"),
            Self::Pong => write!(f, "PONG :{RELAY_HOST}"),
        }
    }
}

/// Encodes the anonymous login as one frame: `PASS`, `NICK` and `JOIN`
/// separated by CRLF.
pub fn handshake(password: &str, nick: &str, channel: &ChannelHandle) -> String {
    [
        Command::Pass(password.to_string()),
        Command::Nick(nick.to_string()),
        Command::Join(channel.clone()),
    ]
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve;

    #[test]
    fn test_command_display_matches_wire_format() {
        let channel = resolve("Ninja").unwrap();
        assert_eq!(Command::Pass("SCHMOOPIIE".into()).to_string(), "PASS SCHMOOPIIE");
        assert_eq!(Command::Nick("justinfan1".into()).to_string(), "NICK justinfan1");
        assert_eq!(Command::Join(channel).to_string(), "JOIN #ninja");
        assert_eq!(Command::Pong.to_string(), "PONG :tmi.twitch.tv");
    }

    #[test]
    fn test_handshake_is_three_crlf_separated_lines() {
        let channel = resolve("ninja").unwrap();
        let frame = handshake("SCHMOOPIIE", "justinfan12345", &channel);
        assert_eq!(
            frame,
            "PASS SCHMOOPIIE\r\nNICK justinfan12345\r\nJOIN #ninja"
        );
    }
}

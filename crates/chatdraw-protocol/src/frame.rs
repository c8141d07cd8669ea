//! Inbound line grammar.
//!
//! The relay speaks IRC over WebSocket. Of everything it sends, the
//! client cares about exactly two shapes:
//!
//! ```text
//! keepalive:  PING[ <anything>]
//! chat:       :<identity>!<ident>@<host> PRIVMSG #<channel> :<text>
//! ```
//!
//! `<identity>`, `<ident>` and `<channel>` are ASCII word characters,
//! `<host>` is any non-empty run without spaces, and `<text>` is the
//! non-empty remainder of the line. Every other line (welcome numerics,
//! JOIN echoes, NOTICEs...) decodes to `None`.

use crate::channel::is_word;

/// A decoded inbound line the client acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Keepalive probe; must be answered with [`Command::Pong`](crate::Command::Pong).
    Ping,
    /// A chat message posted to a channel.
    Chat(ChatFrame),
}

/// The parts of a `PRIVMSG` line the engine uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatFrame {
    /// Login of the sender (the nick part of the prefix).
    pub identity: String,
    /// Channel the message was posted to, without the leading `#`.
    pub channel: String,
    /// Message body.
    pub text: String,
}

impl Frame {
    /// Decodes a single line (without its CRLF terminator).
    ///
    /// Returns `None` for lines the client does not handle.
    pub fn decode(line: &str) -> Option<Frame> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == "PING" || line.starts_with("PING ") {
            return Some(Frame::Ping);
        }
        decode_privmsg(line).map(Frame::Chat)
    }
}

fn decode_privmsg(line: &str) -> Option<ChatFrame> {
    let rest = line.strip_prefix(':')?;
    let (prefix, rest) = rest.split_once(' ')?;

    let (identity, user_host) = prefix.split_once('!')?;
    let (ident, host) = user_host.split_once('@')?;
    if !is_word(identity) || !is_word(ident) || host.is_empty() {
        return None;
    }

    let rest = rest.strip_prefix("PRIVMSG #")?;
    let (channel, rest) = rest.split_once(' ')?;
    if !is_word(channel) {
        return None;
    }

    let text = rest.strip_prefix(':')?;
    if text.is_empty() {
        return None;
    }

    Some(ChatFrame {
        identity: identity.to_string(),
        channel: channel.to_string(),
        text: text.to_string(),
    })
}

/// Splits one WebSocket text frame into its IRC lines.
///
/// The relay batches several CRLF-terminated lines into a single frame;
/// empty lines are skipped.
pub fn split_lines(frame: &str) -> impl Iterator<Item = &str> {
    frame
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
}

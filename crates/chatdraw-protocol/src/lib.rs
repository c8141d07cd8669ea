//! Wire protocol for chatdraw.
//!
//! This crate defines the "language" the client speaks with the chat
//! relay, plus the one piece of input normalization that precedes it:
//!
//! - **Channels** ([`ChannelHandle`], [`resolve`]): turning a stream URL
//!   or bare name into the canonical lowercase channel.
//! - **Frames** ([`Frame`], [`ChatFrame`]): decoding inbound IRC lines.
//! - **Commands** ([`Command`]): encoding the few outbound lines the
//!   client ever sends.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (text frames) → Protocol (lines ↔ Frame/Command) → Session
//! ```
//!
//! Nothing here touches a socket; every function is a pure string
//! operation.

mod channel;
mod command;
mod error;
mod frame;

pub use channel::{ChannelHandle, resolve};
pub use command::{Command, RELAY_HOST, handshake};
pub use error::ProtocolError;
pub use frame::{ChatFrame, Frame, split_lines};

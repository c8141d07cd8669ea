//! Relay session management for chatdraw.
//!
//! This crate owns one socket's full lifecycle:
//!
//! 1. **Dial**: open the transport to the relay ([`ProtocolSession::open`])
//! 2. **Handshake**: anonymous `PASS`/`NICK`/`JOIN` in a single write
//! 3. **Demultiplex**: answer keepalive probes in place, forward chat
//!    frames as [`SessionEvent::Chat`], drop everything else
//! 4. **Close**: on request ([`SessionHandle::close`]), on peer close, or
//!    on a transport failure
//!
//! # How it fits in the stack
//!
//! ```text
//! Controller (above)  ← receives (Epoch, SessionEvent) messages
//!     ↕
//! Session Layer (this crate)  ← socket lifecycle, PING/PONG, decoding
//!     ↕
//! Protocol + Transport (below)  ← line grammar, WebSocket frames
//! ```

mod driver;
mod error;
mod event;
mod nick;
mod session;

pub use driver::{ProtocolSession, SessionHandle, SessionSink};
pub use error::SessionError;
pub use event::{Epoch, SessionEvent, SessionMessage};
pub use nick::guest_nick;
pub use session::{SessionConfig, SessionState};

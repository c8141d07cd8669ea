//! Error types for the session layer.

use chatdraw_transport::TransportError;

/// Errors that end a protocol session.
///
/// A session never returns these to its owner; they travel inside a
/// [`SessionEvent::StateChanged`](crate::SessionEvent::StateChanged) with
/// state [`SessionState::Failed`](crate::SessionState::Failed).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Dialing, reading or writing the socket failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

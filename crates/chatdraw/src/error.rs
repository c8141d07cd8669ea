//! Unified error type for controller calls.

use chatdraw_protocol::ProtocolError;
use chatdraw_selection::SelectionError;

/// Errors a [`ControllerHandle`](crate::ControllerHandle) call can return.
///
/// Every variant is reported synchronously and leaves controller state
/// untouched. Connection failures are not here: they arrive as
/// [`ControllerEvent::ConnectionChanged`](crate::ControllerEvent::ConnectionChanged)
/// events with [`ConnectionState::Error`](crate::ConnectionState::Error).
#[derive(Debug, thiserror::Error)]
pub enum ChatdrawError {
    /// The channel input could not be resolved.
    #[error(transparent)]
    Validation(#[from] ProtocolError),

    /// Engagement mode needs a non-blank trigger keyword.
    #[error("the trigger keyword must not be blank in engagement mode")]
    BlankKeyword,

    /// A draw was requested over an empty collection.
    #[error(transparent)]
    Precondition(#[from] SelectionError),

    /// The controller task has shut down.
    #[error("controller is no longer running")]
    Unavailable,
}

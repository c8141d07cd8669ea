//! Error types for the protocol layer.

/// Errors that can occur in the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The input is neither a channel URL nor a bare channel name.
    ///
    /// Callers must not attempt a connection after this error.
    #[error("channel not found in {0:?}")]
    ChannelNotFound(String),
}

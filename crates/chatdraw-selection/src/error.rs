//! Error types for selection.

/// Errors a draw can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// There was nothing to choose from.
    #[error("cannot draw from an empty {0}")]
    Empty(&'static str),
}

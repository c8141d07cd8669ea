//! What a session reports to its owner.

use std::fmt;

use chatdraw_protocol::ChatFrame;

use crate::{SessionError, SessionState};

/// Generation token for protocol sessions.
///
/// Closing a session is asynchronous: the owner signals the session task
/// and moves on, but the task may already have pushed a few messages into
/// the sink, and it still reports its own `Closed` transition afterwards.
/// Without a way to tell those late deliveries apart, a chat line from the
/// previous channel could land in the history of the next one.
///
/// The owner therefore advances the epoch every time it starts or stops a
/// session, hands the new epoch to the session it opens, and drops any
/// [`SessionMessage`] whose epoch is not the current one. Comparing one
/// integer at handler entry is all it takes; the session itself never
/// needs to know it has been superseded.
///
/// ```
/// use chatdraw_session::Epoch;
///
/// let running = Epoch::default().next();
/// let after_stop = running.next();
/// assert_ne!(running, after_stop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// Returns the epoch that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch-{}", self.0)
    }
}

/// A lifecycle change or a decoded chat frame.
#[derive(Debug)]
pub enum SessionEvent {
    /// The session moved to `state`. `error` is set only for
    /// [`SessionState::Failed`].
    StateChanged {
        state: SessionState,
        error: Option<SessionError>,
    },
    /// A chat message arrived.
    Chat(ChatFrame),
}

/// A [`SessionEvent`] tagged with the epoch of the session that emitted it.
#[derive(Debug)]
pub struct SessionMessage {
    pub epoch: Epoch,
    pub event: SessionEvent,
}

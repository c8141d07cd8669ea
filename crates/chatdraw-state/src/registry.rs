//! The participant registry.
//!
//! Every identity that sends the trigger keyword enters once. Draws are
//! uniform over the registry's entries, so the no-duplicates rule is
//! what makes a draw fair: an identity listed twice would win twice as
//! often.

use std::collections::HashSet;

/// Deduplicated, insertion-ordered set of participant identities.
///
/// Two structures back the registry because the two questions it answers
/// want different shapes: "has this identity entered already?" is asked
/// on every triggered chat line and wants a `HashSet`, while the front
/// end lists participants in the order they entered and the draw indexes
/// into them, which wants a `Vec`. Both are only ever changed together,
/// inside [`try_add`](Self::try_add) and [`clear`](Self::clear).
///
/// The registry also remembers the most recent winner so a front end can
/// keep showing it after the draw. Clearing the registry forgets the
/// winner too: a winner from a list that no longer exists is stale.
///
/// The registry has no locks. It is owned by a single actor task, which
/// applies chat events and draws one at a time.
#[derive(Debug, Clone, Default)]
pub struct ParticipantRegistry {
    /// Display order.
    order: Vec<String>,
    /// Membership index, kept in sync with `order`.
    members: HashSet<String>,
    last_winner: Option<String>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `identity` if it is not already registered.
    ///
    /// Returns `true` only for the call that actually inserted it, so the
    /// caller can announce each participant exactly once.
    pub fn try_add(&mut self, identity: &str) -> bool {
        if self.members.contains(identity) {
            return false;
        }
        self.members.insert(identity.to_string());
        self.order.push(identity.to_string());
        tracing::debug!(identity, participants = self.order.len(), "participant registered");
        true
    }

    /// Forgets every participant and the last winner.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
        self.last_winner = None;
    }

    /// Participants in the order they entered.
    pub fn snapshot(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Borrowed view of the participants, in entry order.
    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn record_winner(&mut self, identity: impl Into<String>) {
        self.last_winner = Some(identity.into());
    }

    pub fn last_winner(&self) -> Option<&str> {
        self.last_winner.as_deref()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

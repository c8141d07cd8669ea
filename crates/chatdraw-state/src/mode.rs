//! Engagement mode and the trigger rule.

use std::fmt;

use serde::Serialize;

/// What a running session does with chat.
///
/// The mode is fixed when a session starts; changing it takes a full
/// restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementMode {
    /// Keyword messages enter their senders into the registry.
    #[default]
    Engagement,
    /// Chat is relayed for display only; nothing ever triggers.
    Observe,
}

impl fmt::Display for EngagementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engagement => write!(f, "engagement"),
            Self::Observe => write!(f, "observe"),
        }
    }
}

/// Returns `true` if `text` enters its sender in the current mode.
///
/// In engagement mode this is a case-insensitive substring match on the
/// keyword; observe mode never triggers.
pub fn is_triggered(mode: EngagementMode, keyword: &str, text: &str) -> bool {
    match mode {
        EngagementMode::Engagement => {
            text.to_lowercase().contains(&keyword.to_lowercase())
        }
        EngagementMode::Observe => false,
    }
}

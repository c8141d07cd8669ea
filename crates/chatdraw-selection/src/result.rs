//! Selection results and the per-kind "last result" memory.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which draw produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Winner,
    WheelPick,
    CoinFlip,
}

/// The outcome of one draw, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionResult {
    pub kind: SelectionKind,
    pub value: String,
    pub at: DateTime<Utc>,
}

impl SelectionResult {
    /// Stamps a result with the current time.
    pub fn now(kind: SelectionKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            at: Utc::now(),
        }
    }
}

/// The most recent result of each kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LastResults {
    pub winner: Option<SelectionResult>,
    pub wheel: Option<SelectionResult>,
    pub coin: Option<SelectionResult>,
}

impl LastResults {
    /// Stores `result` in the slot for its kind, replacing the previous one.
    pub fn record(&mut self, result: SelectionResult) {
        let slot = match result.kind {
            SelectionKind::Winner => &mut self.winner,
            SelectionKind::WheelPick => &mut self.wheel,
            SelectionKind::CoinFlip => &mut self.coin,
        };
        *slot = Some(result);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_one_result_per_kind() {
        let mut last = LastResults::default();
        last.record(SelectionResult::now(SelectionKind::Winner, "bob"));
        last.record(SelectionResult::now(SelectionKind::CoinFlip, "heads"));
        last.record(SelectionResult::now(SelectionKind::Winner, "amy"));

        assert_eq!(last.winner.as_ref().map(|r| r.value.as_str()), Some("amy"));
        assert_eq!(last.coin.as_ref().map(|r| r.value.as_str()), Some("heads"));
        assert!(last.wheel.is_none());
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut last = LastResults::default();
        last.record(SelectionResult::now(SelectionKind::WheelPick, "pizza"));
        last.clear();
        assert_eq!(last, LastResults::default());
    }

    #[test]
    fn test_selection_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SelectionKind::WheelPick).unwrap();
        assert_eq!(json, "\"wheel_pick\"");
    }
}

//! Plain-text participant export.

use chrono::NaiveDate;

/// One `"<rank>. <identity>"` line per participant, ranks from 1,
/// joined with `\n` (no trailing newline).
pub fn format_participants(participants: &[String]) -> String {
    participants
        .iter()
        .enumerate()
        .map(|(i, identity)| format!("{}. {identity}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// File name for an export: `participants_<channel>_<YYYY-MM-DD>.txt`.
pub fn export_file_name(channel: &str, date: NaiveDate) -> String {
    format!("participants_{channel}_{}.txt", date.format("%Y-%m-%d"))
}

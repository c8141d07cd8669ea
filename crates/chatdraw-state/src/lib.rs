//! Session state for chatdraw.
//!
//! Pure data structures, no networking and no async:
//!
//! - [`ChatHistory`]: the bounded window of recent [`ChatEvent`]s
//! - [`ParticipantRegistry`]: who has entered the current giveaway
//! - [`EngagementMode`] and [`is_triggered`]: when a message counts as
//!   an entry
//! - [`format_participants`] / [`export_file_name`]: plain-text export
//!
//! Everything here is owned by a single controller task, so nothing
//! needs interior mutability or locking.

mod chat;
mod export;
mod mode;
mod registry;

pub use chat::{ChatEvent, ChatHistory, DEFAULT_HISTORY_LIMIT, SYSTEM_IDENTITY};
pub use export::{export_file_name, format_participants};
pub use mode::{EngagementMode, is_triggered};
pub use registry::ParticipantRegistry;

//! Texts of the system notices the controller writes into chat history.

use chatdraw_protocol::ChannelHandle;
use chatdraw_state::EngagementMode;

pub(crate) fn started(mode: EngagementMode, keyword: &str) -> String {
    match mode {
        EngagementMode::Engagement => {
            format!("Giveaway started! Type \"{keyword}\" in chat to enter.")
        }
        EngagementMode::Observe => "Joined chat to watch messages.".to_string(),
    }
}

pub(crate) fn connecting(channel: &ChannelHandle) -> String {
    format!("Connecting to #{channel}...")
}

pub(crate) fn connected(
    mode: EngagementMode,
    channel: &ChannelHandle,
    keyword: &str,
) -> String {
    match mode {
        EngagementMode::Engagement => format!(
            "Connected to #{channel}! Giveaway is live, type \"{keyword}\"."
        ),
        EngagementMode::Observe => {
            format!("Connected to #{channel}! Just reading chat.")
        }
    }
}

pub(crate) fn disconnected() -> String {
    "Disconnected from chat.".to_string()
}

pub(crate) fn connection_error(error: &str) -> String {
    format!("Chat connection error: {error}")
}

pub(crate) fn joined(identity: &str) -> String {
    format!("{identity} joined the giveaway!")
}

pub(crate) fn winner(identity: &str) -> String {
    format!("Winner: {identity}!")
}

//! # chatdraw
//!
//! Live chat ingestion and giveaway selection engine.
//!
//! chatdraw keeps an anonymous, read-only connection to a public chat
//! relay, watches the chat for a trigger keyword, keeps a deduplicated
//! list of everyone who typed it, and runs fair draws over that list
//! (plus a free-form wheel and a coin). A front end drives it through a
//! [`ControllerHandle`] and renders the [`ControllerEvent`] stream.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatdraw::prelude::*;
//!
//! # async fn run() -> Result<(), ChatdrawError> {
//! let controller = ControllerBuilder::new()
//!     .keyword("!join")
//!     .build(WebSocketDialer::new());
//! let mut events = controller.subscribe();
//!
//! controller.start("twitch.tv/ninja", EngagementMode::Engagement).await?;
//! while let Ok(event) = events.recv().await {
//!     if let ControllerEvent::ParticipantsChanged { participants } = event {
//!         println!("{} entered", participants.len());
//!     }
//! }
//! let winner = controller.select_winner().await?;
//! println!("winner: {}", winner.value);
//! # Ok(())
//! # }
//! ```

mod config;
mod controller;
mod error;
mod events;
mod notice;

pub use config::{ControllerBuilder, ControllerConfig, DEFAULT_KEYWORD};
pub use controller::ControllerHandle;
pub use error::ChatdrawError;
pub use events::{ConnectionState, ControllerEvent, ControllerSnapshot};

/// Re-exports everything a front end needs.
///
/// ```rust
/// use chatdraw::prelude::*;
/// ```
pub mod prelude {
    pub use chatdraw_protocol::{ChannelHandle, ProtocolError, resolve};
    pub use chatdraw_selection::{
        CoinSide, LastResults, SelectionError, SelectionKind, SelectionResult,
    };
    pub use chatdraw_session::SessionConfig;
    pub use chatdraw_state::{
        ChatEvent, EngagementMode, export_file_name, format_participants,
    };
    pub use chatdraw_transport::{Dialer, WebSocketDialer};

    pub use crate::{
        ChatdrawError, ConnectionState, ControllerBuilder, ControllerConfig,
        ControllerEvent, ControllerHandle, ControllerSnapshot,
    };
}

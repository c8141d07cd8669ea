//! Controller configuration and builder.

use std::sync::Arc;

use chatdraw_session::SessionConfig;
use chatdraw_state::DEFAULT_HISTORY_LIMIT;
use chatdraw_transport::Dialer;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ControllerHandle;
use crate::controller;

/// Trigger keyword used until the caller sets another one.
pub const DEFAULT_KEYWORD: &str = "!участвую";

// ---------------------------------------------------------------------------
// ControllerConfig
// ---------------------------------------------------------------------------

/// Configuration for a controller instance.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Relay endpoint and anonymous login details.
    pub session: SessionConfig,

    /// Trigger keyword. Latched at each `start`; later changes apply to
    /// the next session.
    pub keyword: String,

    /// How many chat events the history keeps.
    pub history_limit: usize,

    /// Capacity of the command mailbox.
    pub command_buffer: usize,

    /// Capacity of the event broadcast. Subscribers that fall further
    /// behind than this see `RecvError::Lagged`.
    pub event_buffer: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            keyword: DEFAULT_KEYWORD.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            command_buffer: 64,
            event_buffer: 256,
        }
    }
}

// ---------------------------------------------------------------------------
// ControllerBuilder
// ---------------------------------------------------------------------------

/// Builder for spawning a controller.
///
/// # Example
///
/// ```rust,no_run
/// use chatdraw::prelude::*;
///
/// # async fn run() -> Result<(), ChatdrawError> {
/// let controller = ControllerBuilder::new()
///     .keyword("!join")
///     .build(WebSocketDialer::new());
/// controller.start("https://twitch.tv/ninja", EngagementMode::Engagement).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ControllerBuilder {
    config: ControllerConfig,
    rng_seed: Option<u64>,
}

impl ControllerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the relay endpoint.
    pub fn relay_url(mut self, url: impl Into<String>) -> Self {
        self.config.session.relay_url = url.into();
        self
    }

    /// Sets the initial trigger keyword, trimmed of surrounding whitespace.
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.config.keyword = keyword.into().trim().to_string();
        self
    }

    /// Sets how many chat events the history keeps.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Seeds the random source so draws are reproducible.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Spawns the controller task and returns its handle.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build<D: Dialer>(self, dialer: D) -> ControllerHandle {
        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        controller::spawn(self.config, Arc::new(dialer), rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.keyword, "!участвую");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.session.relay_url, "wss://irc-ws.chat.twitch.tv:443");
    }

    #[test]
    fn test_builder_overrides() {
        let builder = ControllerBuilder::new()
            .relay_url("ws://127.0.0.1:9")
            .keyword("!join")
            .history_limit(10)
            .rng_seed(3);
        assert_eq!(builder.config.session.relay_url, "ws://127.0.0.1:9");
        assert_eq!(builder.config.keyword, "!join");
        assert_eq!(builder.config.history_limit, 10);
        assert_eq!(builder.rng_seed, Some(3));
    }

    #[test]
    fn test_builder_keyword_is_trimmed() {
        let builder = ControllerBuilder::new().keyword("  !join \t");
        assert_eq!(builder.config.keyword, "!join");
    }
}

//! Controller actor: one Tokio task that owns all engagement state.
//!
//! The outside world talks to it through a [`ControllerHandle`] (mpsc
//! commands with oneshot replies) and listens on a broadcast channel of
//! [`ControllerEvent`]s. The running protocol session, if any, reports
//! into the same task through an unbounded channel of epoch-tagged
//! [`SessionMessage`]s.
//!
//! Only the actor touches history, registry, wheel and results, and it
//! handles one message at a time, so a draw never sees a half-applied
//! chat frame.

use std::sync::Arc;

use chatdraw_protocol::{ChannelHandle, ChatFrame, resolve};
use chatdraw_selection::{
    LastResults, SelectionKind, SelectionResult, Wheel, flip_coin,
    pick_wheel_entry, pick_winner,
};
use chatdraw_session::{
    Epoch, ProtocolSession, SessionError, SessionEvent, SessionHandle,
    SessionMessage, SessionSink, SessionState,
};
use chatdraw_state::{
    ChatEvent, ChatHistory, EngagementMode, ParticipantRegistry, is_triggered,
};
use chatdraw_transport::Dialer;
use rand::rngs::StdRng;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    ChatdrawError, ConnectionState, ControllerConfig, ControllerEvent,
    ControllerSnapshot, notice,
};

type Reply<T> = oneshot::Sender<T>;

/// Commands sent to the controller actor.
pub(crate) enum ControllerCommand {
    Start {
        raw: String,
        mode: EngagementMode,
        reply: Reply<Result<ChannelHandle, ChatdrawError>>,
    },
    Stop {
        reply: Reply<()>,
    },
    ClearParticipants {
        reply: Reply<()>,
    },
    SelectWinner {
        reply: Reply<Result<SelectionResult, ChatdrawError>>,
    },
    Spin {
        entries: Vec<String>,
        reply: Reply<Result<SelectionResult, ChatdrawError>>,
    },
    SpinWheel {
        reply: Reply<Result<SelectionResult, ChatdrawError>>,
    },
    AddWheelEntry {
        entry: String,
        reply: Reply<bool>,
    },
    RemoveWheelEntry {
        index: usize,
        reply: Reply<Option<String>>,
    },
    Flip {
        reply: Reply<SelectionResult>,
    },
    SetKeyword {
        keyword: String,
        reply: Reply<()>,
    },
    Snapshot {
        reply: Reply<ControllerSnapshot>,
    },
    Shutdown,
}

// ---------------------------------------------------------------------------
// ControllerHandle
// ---------------------------------------------------------------------------

/// Handle to a running controller. Cheap to clone.
///
/// Every method fails with [`ChatdrawError::Unavailable`] once the
/// controller has shut down.
#[derive(Clone)]
pub struct ControllerHandle {
    commands: mpsc::Sender<ControllerCommand>,
    events: broadcast::Sender<ControllerEvent>,
}

impl ControllerHandle {
    /// Resolves `raw` to a channel and starts a session on it in `mode`.
    ///
    /// Any running session is torn down first, and history, participants
    /// and last results are cleared. The configured keyword is latched
    /// for the whole session.
    ///
    /// # Errors
    /// [`ChatdrawError::Validation`] if `raw` is not a channel, or
    /// [`ChatdrawError::BlankKeyword`] in engagement mode with a blank
    /// keyword. Either way nothing changes. Connection failures are
    /// reported as events, not here.
    pub async fn start(
        &self,
        raw: &str,
        mode: EngagementMode,
    ) -> Result<ChannelHandle, ChatdrawError> {
        let raw = raw.to_string();
        self.request(|reply| ControllerCommand::Start { raw, mode, reply })
            .await?
    }

    /// Closes the running session and reverts the mode to engagement.
    pub async fn stop(&self) -> Result<(), ChatdrawError> {
        self.request(|reply| ControllerCommand::Stop { reply }).await
    }

    /// Empties the participant registry and forgets the last winner.
    pub async fn clear_participants(&self) -> Result<(), ChatdrawError> {
        self.request(|reply| ControllerCommand::ClearParticipants { reply })
            .await
    }

    /// Draws a winner from the registered participants.
    ///
    /// # Errors
    /// [`ChatdrawError::Precondition`] if nobody has entered.
    pub async fn select_winner(&self) -> Result<SelectionResult, ChatdrawError> {
        self.request(|reply| ControllerCommand::SelectWinner { reply })
            .await?
    }

    /// Spins a caller-supplied list of entries.
    ///
    /// # Errors
    /// [`ChatdrawError::Precondition`] if `entries` is empty.
    pub async fn spin(
        &self,
        entries: Vec<String>,
    ) -> Result<SelectionResult, ChatdrawError> {
        self.request(|reply| ControllerCommand::Spin { entries, reply })
            .await?
    }

    /// Spins the controller's own wheel.
    ///
    /// # Errors
    /// [`ChatdrawError::Precondition`] if the wheel has no entries.
    pub async fn spin_wheel(&self) -> Result<SelectionResult, ChatdrawError> {
        self.request(|reply| ControllerCommand::SpinWheel { reply })
            .await?
    }

    /// Adds a wheel entry. Returns `false` if `entry` is blank.
    pub async fn add_wheel_entry(&self, entry: &str) -> Result<bool, ChatdrawError> {
        let entry = entry.to_string();
        self.request(|reply| ControllerCommand::AddWheelEntry { entry, reply })
            .await
    }

    /// Removes the wheel entry at `index`, returning it.
    pub async fn remove_wheel_entry(
        &self,
        index: usize,
    ) -> Result<Option<String>, ChatdrawError> {
        self.request(|reply| ControllerCommand::RemoveWheelEntry { index, reply })
            .await
    }

    /// Flips a coin.
    pub async fn flip(&self) -> Result<SelectionResult, ChatdrawError> {
        self.request(|reply| ControllerCommand::Flip { reply }).await
    }

    /// Sets the keyword the next `start` latches. Surrounding whitespace
    /// is trimmed.
    pub async fn set_keyword(&self, keyword: &str) -> Result<(), ChatdrawError> {
        let keyword = keyword.trim().to_string();
        self.request(|reply| ControllerCommand::SetKeyword { keyword, reply })
            .await
    }

    /// Returns a copy of the controller's current state.
    pub async fn snapshot(&self) -> Result<ControllerSnapshot, ChatdrawError> {
        self.request(|reply| ControllerCommand::Snapshot { reply }).await
    }

    /// Subscribes to controller events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Closes any running session and stops the controller task.
    pub async fn shutdown(&self) -> Result<(), ChatdrawError> {
        self.commands
            .send(ControllerCommand::Shutdown)
            .await
            .map_err(|_| ChatdrawError::Unavailable)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> ControllerCommand,
    ) -> Result<T, ChatdrawError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| ChatdrawError::Unavailable)?;
        reply_rx.await.map_err(|_| ChatdrawError::Unavailable)
    }
}

/// Spawns a controller task and returns its handle.
pub(crate) fn spawn<D: Dialer>(
    config: ControllerConfig,
    dialer: Arc<D>,
    rng: StdRng,
) -> ControllerHandle {
    let (actor, handle) = ControllerActor::new(config, dialer, rng);
    tokio::spawn(actor.run());
    handle
}

// ---------------------------------------------------------------------------
// ControllerActor
// ---------------------------------------------------------------------------

/// Owns every piece of giveaway state and is the only writer to it.
///
/// Two inputs feed the loop: commands from [`ControllerHandle`]s and
/// events from the protocol session. Because commands
/// and session events are handled one at a time on the same task, the
/// registry, history and wheel need no locks, and a command reply always
/// reflects every session event that arrived before it.
///
/// Each `start` and `stop` advances `epoch`. The open session is tagged
/// with the epoch it was opened under, so events it emits after being
/// replaced are recognized and dropped at the top of
/// `handle_session_message` instead of leaking into the next session's
/// history or registry.
///
/// `connection` mirrors the session lifecycle for observers. It is set
/// to `Connecting` as soon as a start succeeds, then follows the session
/// state changes until `stop` or a terminal state resets it.
struct ControllerActor<D: Dialer> {
    config: ControllerConfig,
    dialer: Arc<D>,
    commands: mpsc::Receiver<ControllerCommand>,
    events: broadcast::Sender<ControllerEvent>,
    session_tx: SessionSink,
    session_rx: mpsc::UnboundedReceiver<SessionMessage>,

    epoch: Epoch,
    session: Option<SessionHandle>,
    channel: Option<ChannelHandle>,
    connection: ConnectionState,
    mode: EngagementMode,
    /// Keyword latched by the current session.
    active_keyword: String,

    history: ChatHistory,
    registry: ParticipantRegistry,
    wheel: Wheel,
    last_results: LastResults,
    rng: StdRng,
}

impl<D: Dialer> ControllerActor<D> {
    fn new(
        config: ControllerConfig,
        dialer: Arc<D>,
        rng: StdRng,
    ) -> (Self, ControllerHandle) {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (event_tx, _) = broadcast::channel(config.event_buffer.max(1));
        let (session_tx, session_rx) = mpsc::unbounded_channel();

        let handle = ControllerHandle {
            commands: command_tx,
            events: event_tx.clone(),
        };
        let actor = Self {
            history: ChatHistory::new(config.history_limit),
            active_keyword: config.keyword.clone(),
            config,
            dialer,
            commands: command_rx,
            events: event_tx,
            session_tx,
            session_rx,
            epoch: Epoch::default(),
            session: None,
            channel: None,
            connection: ConnectionState::Disconnected,
            mode: EngagementMode::Engagement,
            registry: ParticipantRegistry::new(),
            wheel: Wheel::new(),
            last_results: LastResults::default(),
            rng,
        };
        (actor, handle)
    }

    /// Runs the actor loop until shutdown or until every handle is gone.
    async fn run(mut self) {
        tracing::info!("controller started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(ControllerCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(message) = self.session_rx.recv() => {
                    self.handle_session_message(message);
                }
            }
        }

        if let Some(mut session) = self.session.take() {
            session.close();
            session.wait().await;
        }
        tracing::info!("controller stopped");
    }

    fn handle_command(&mut self, command: ControllerCommand) {
        match command {
            ControllerCommand::Start { raw, mode, reply } => {
                let _ = reply.send(self.handle_start(&raw, mode));
            }
            ControllerCommand::Stop { reply } => {
                self.handle_stop();
                let _ = reply.send(());
            }
            ControllerCommand::ClearParticipants { reply } => {
                self.handle_clear_participants();
                let _ = reply.send(());
            }
            ControllerCommand::SelectWinner { reply } => {
                let _ = reply.send(self.handle_select_winner());
            }
            ControllerCommand::Spin { entries, reply } => {
                let _ = reply.send(self.handle_spin(&entries));
            }
            ControllerCommand::SpinWheel { reply } => {
                let _ = reply.send(self.handle_spin_wheel());
            }
            ControllerCommand::AddWheelEntry { entry, reply } => {
                let added = self.wheel.add(&entry);
                if added {
                    self.publish_wheel();
                }
                let _ = reply.send(added);
            }
            ControllerCommand::RemoveWheelEntry { index, reply } => {
                let removed = self.wheel.remove(index);
                if removed.is_some() {
                    if self.wheel.is_empty() {
                        tracing::debug!("wheel emptied");
                    }
                    self.publish_wheel();
                }
                let _ = reply.send(removed);
            }
            ControllerCommand::Flip { reply } => {
                let _ = reply.send(self.handle_flip());
            }
            ControllerCommand::SetKeyword { keyword, reply } => {
                tracing::debug!(%keyword, "keyword set");
                self.config.keyword = keyword;
                let _ = reply.send(());
            }
            ControllerCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            // Handled by the run loop.
            ControllerCommand::Shutdown => {}
        }
    }

    fn handle_start(
        &mut self,
        raw: &str,
        mode: EngagementMode,
    ) -> Result<ChannelHandle, ChatdrawError> {
        let channel = resolve(raw)?;
        if mode == EngagementMode::Engagement && self.config.keyword.trim().is_empty() {
            return Err(ChatdrawError::BlankKeyword);
        }

        self.close_session();
        self.epoch = self.epoch.next();
        self.channel = Some(channel.clone());
        self.mode = mode;
        self.active_keyword = self.config.keyword.trim().to_string();
        self.history.clear();
        self.registry.clear();
        self.last_results.clear();

        tracing::info!(
            %channel,
            %mode,
            epoch = %self.epoch,
            keyword = %self.active_keyword,
            "starting session"
        );

        self.history
            .push(ChatEvent::notice(notice::started(mode, &self.active_keyword)));
        self.history.push(ChatEvent::notice(notice::connecting(&channel)));
        self.publish_history();
        self.publish_participants();

        let session = ProtocolSession::new(
            Arc::clone(&self.dialer),
            self.config.session.clone(),
            channel.clone(),
            self.epoch,
            self.session_tx.clone(),
        );
        self.session = Some(session.open());
        // A failed or closed previous session must not linger in the
        // snapshot while the new one dials.
        self.set_connection(ConnectionState::Connecting, None);

        Ok(channel)
    }

    fn handle_stop(&mut self) {
        let was_running = self.session.is_some();
        self.close_session();
        self.epoch = self.epoch.next();
        self.mode = EngagementMode::Engagement;

        if was_running {
            tracing::info!(epoch = %self.epoch, "session stopped");
            self.push_notice(notice::disconnected());
        }
        if self.connection != ConnectionState::Disconnected {
            self.set_connection(ConnectionState::Disconnected, None);
        }
    }

    fn handle_clear_participants(&mut self) {
        self.registry.clear();
        self.last_results.winner = None;
        tracing::info!("participants cleared");
        self.publish_participants();
    }

    fn handle_select_winner(&mut self) -> Result<SelectionResult, ChatdrawError> {
        let winner = pick_winner(&mut self.rng, self.registry.as_slice())?.clone();
        tracing::info!(
            %winner,
            participants = self.registry.len(),
            "winner selected"
        );
        self.registry.record_winner(winner.clone());
        self.push_notice(notice::winner(&winner));
        Ok(self.record(SelectionResult::now(SelectionKind::Winner, winner)))
    }

    fn handle_spin(&mut self, entries: &[String]) -> Result<SelectionResult, ChatdrawError> {
        let value = pick_wheel_entry(&mut self.rng, entries)?.clone();
        tracing::debug!(%value, entries = entries.len(), "wheel spun");
        Ok(self.record(SelectionResult::now(SelectionKind::WheelPick, value)))
    }

    fn handle_spin_wheel(&mut self) -> Result<SelectionResult, ChatdrawError> {
        let value = self.wheel.spin(&mut self.rng)?.to_string();
        tracing::debug!(%value, entries = self.wheel.len(), "wheel spun");
        Ok(self.record(SelectionResult::now(SelectionKind::WheelPick, value)))
    }

    fn handle_flip(&mut self) -> SelectionResult {
        let side = flip_coin(&mut self.rng);
        tracing::debug!(%side, "coin flipped");
        self.record(SelectionResult::now(SelectionKind::CoinFlip, side.to_string()))
    }

    // --- Session events ---

    fn handle_session_message(&mut self, message: SessionMessage) {
        if message.epoch != self.epoch {
            tracing::debug!(
                stale = %message.epoch,
                current = %self.epoch,
                "dropping event from a closed session"
            );
            return;
        }
        match message.event {
            SessionEvent::StateChanged { state, error } => {
                self.handle_session_state(state, error);
            }
            SessionEvent::Chat(frame) => self.handle_chat(frame),
        }
    }

    fn handle_session_state(&mut self, state: SessionState, error: Option<SessionError>) {
        let error = error.map(|e| e.to_string());
        match state {
            SessionState::Joined => {
                let text = self.channel.as_ref().map(|channel| {
                    notice::connected(self.mode, channel, &self.active_keyword)
                });
                if let Some(text) = text {
                    self.push_notice(text);
                }
            }
            SessionState::Failed => {
                let reason = error.as_deref().unwrap_or("unknown error");
                tracing::warn!(epoch = %self.epoch, error = reason, "session failed");
                self.push_notice(notice::connection_error(reason));
            }
            SessionState::Closed => {
                self.push_notice(notice::disconnected());
            }
            SessionState::Idle | SessionState::Connecting => {}
        }
        if state.is_terminal() {
            self.session = None;
        }

        let connection = ConnectionState::from_session(state);
        if connection != self.connection || error.is_some() {
            self.set_connection(connection, error);
        }
    }

    fn handle_chat(&mut self, frame: ChatFrame) {
        let ChatFrame {
            identity,
            channel,
            text,
        } = frame;
        let ours = self
            .channel
            .as_ref()
            .is_some_and(|current| current.as_str().eq_ignore_ascii_case(&channel));
        if !ours {
            tracing::trace!(%channel, "ignoring message for another channel");
            return;
        }

        let triggered = is_triggered(self.mode, &self.active_keyword, &text);
        self.history
            .push(ChatEvent::chat(identity.clone(), text, triggered));

        if triggered && self.registry.try_add(&identity) {
            tracing::info!(
                %identity,
                participants = self.registry.len(),
                "participant entered"
            );
            self.history.push(ChatEvent::notice(notice::joined(&identity)));
            self.publish_participants();
        }
        self.publish_history();
    }

    // --- Helpers ---

    fn close_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            tracing::debug!(
                epoch = %session.epoch(),
                finished = session.is_finished(),
                "closing session"
            );
            session.close();
        }
    }

    fn record(&mut self, result: SelectionResult) -> SelectionResult {
        self.last_results.record(result.clone());
        self.publish(ControllerEvent::Selection {
            result: result.clone(),
        });
        result
    }

    fn push_notice(&mut self, text: String) {
        self.history.push(ChatEvent::notice(text));
        self.publish_history();
    }

    fn set_connection(&mut self, state: ConnectionState, error: Option<String>) {
        self.connection = state;
        self.publish(ControllerEvent::ConnectionChanged {
            state,
            channel: self.channel.clone(),
            error,
        });
    }

    fn publish_history(&self) {
        self.publish(ControllerEvent::HistoryChanged {
            history: self.history.snapshot(),
        });
    }

    fn publish_participants(&self) {
        self.publish(ControllerEvent::ParticipantsChanged {
            participants: self.registry.snapshot(),
        });
    }

    fn publish_wheel(&self) {
        self.publish(ControllerEvent::WheelChanged {
            entries: self.wheel.entries().to_vec(),
        });
    }

    fn publish(&self, event: ControllerEvent) {
        // No subscribers is fine; events are advisory.
        let _ = self.events.send(event);
    }

    fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            channel: self.channel.clone(),
            connection: self.connection,
            mode: self.mode,
            keyword: self.config.keyword.clone(),
            history: self.history.snapshot(),
            history_limit: self.history.limit(),
            participants: self.registry.snapshot(),
            last_winner: self.registry.last_winner().map(str::to_string),
            wheel: self.wheel.entries().to_vec(),
            last_results: self.last_results.clone(),
        }
    }
}

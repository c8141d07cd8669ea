//! The protocol session task.
//!
//! [`ProtocolSession::open`] spawns one Tokio task per session. The task
//! owns the connection outright: it dials, logs in, then loops reading
//! frames until the relay hangs up, the socket fails, or the owner asks
//! it to stop through the [`SessionHandle`]. Everything it learns goes
//! out through the [`SessionSink`], tagged with the session's [`Epoch`].
//!
//! Keepalive probes are answered inside the task and never reach the
//! sink.

use std::sync::Arc;

use chatdraw_protocol::{ChannelHandle, Command, Frame, handshake, split_lines};
use chatdraw_transport::{Connection, Dialer};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::{
    Epoch, SessionConfig, SessionError, SessionEvent, SessionMessage,
    SessionState, guest_nick,
};

/// Where a session delivers its events.
pub type SessionSink = mpsc::UnboundedSender<SessionMessage>;

/// One not-yet-opened relay session.
pub struct ProtocolSession<D: Dialer> {
    dialer: Arc<D>,
    config: SessionConfig,
    channel: ChannelHandle,
    epoch: Epoch,
    state: SessionState,
    sink: SessionSink,
}

impl<D: Dialer> ProtocolSession<D> {
    /// Prepares a session for `channel`. Nothing happens until [`open`](Self::open).
    pub fn new(
        dialer: Arc<D>,
        config: SessionConfig,
        channel: ChannelHandle,
        epoch: Epoch,
        sink: SessionSink,
    ) -> Self {
        Self {
            dialer,
            config,
            channel,
            epoch,
            state: SessionState::Idle,
            sink,
        }
    }

    /// Spawns the session task and returns the handle that stops it.
    pub fn open(self) -> SessionHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let epoch = self.epoch;
        let task = tokio::spawn(self.run(shutdown_rx));
        SessionHandle {
            epoch,
            shutdown: Some(shutdown_tx),
            task,
        }
    }

    async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        self.transition(SessionState::Connecting, None);
        tracing::info!(
            epoch = %self.epoch,
            channel = %self.channel,
            url = %self.config.relay_url,
            "dialing relay"
        );

        let dialer = Arc::clone(&self.dialer);
        let url = self.config.relay_url.clone();
        let dialed = tokio::select! {
            biased;
            _ = &mut shutdown => None,
            result = dialer.dial(&url) => Some(result),
        };

        let conn = match dialed {
            None => {
                tracing::info!(epoch = %self.epoch, "session closed while dialing");
                self.transition(SessionState::Closed, None);
                return;
            }
            Some(Err(e)) => {
                self.fail(e.into());
                return;
            }
            Some(Ok(conn)) => conn,
        };

        let nick = guest_nick(&self.config.nick_prefix);
        let login = handshake(&self.config.password, &nick, &self.channel);
        if let Err(e) = conn.send(&login).await {
            self.fail(e.into());
            return;
        }

        self.transition(SessionState::Joined, None);
        tracing::info!(
            epoch = %self.epoch,
            conn_id = %conn.id(),
            channel = %self.channel,
            %nick,
            "joined channel"
        );

        loop {
            let received = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                received = conn.recv() => Some(received),
            };

            match received {
                None => {
                    if let Err(e) = conn.close().await {
                        tracing::debug!(epoch = %self.epoch, error = %e, "close handshake failed");
                    }
                    tracing::info!(epoch = %self.epoch, "session closed by owner");
                    self.transition(SessionState::Closed, None);
                    return;
                }
                Some(Ok(Some(frame))) => {
                    if let Err(e) = self.handle_frame(&conn, &frame).await {
                        self.fail(e);
                        return;
                    }
                }
                Some(Ok(None)) => {
                    // Flush our half of the close handshake before the
                    // socket is dropped.
                    if let Err(e) = conn.close().await {
                        tracing::debug!(epoch = %self.epoch, error = %e, "close reply failed");
                    }
                    tracing::info!(epoch = %self.epoch, "relay closed the connection");
                    self.transition(SessionState::Closed, None);
                    return;
                }
                Some(Err(e)) => {
                    self.fail(e.into());
                    return;
                }
            }
        }
    }

    /// Processes every line in one inbound frame, in order.
    async fn handle_frame(
        &self,
        conn: &D::Connection,
        frame: &str,
    ) -> Result<(), SessionError> {
        for line in split_lines(frame) {
            tracing::trace!(epoch = %self.epoch, line, "inbound line");
            match Frame::decode(line) {
                Some(Frame::Ping) => {
                    conn.send(&Command::Pong.to_string()).await?;
                }
                Some(Frame::Chat(chat)) => {
                    self.emit(SessionEvent::Chat(chat));
                }
                None => {
                    tracing::trace!(epoch = %self.epoch, line, "ignoring control line");
                }
            }
        }
        Ok(())
    }

    fn fail(&mut self, error: SessionError) {
        tracing::warn!(epoch = %self.epoch, error = %error, "session failed");
        self.transition(SessionState::Failed, Some(error));
    }

    fn transition(&mut self, next: SessionState, error: Option<SessionError>) {
        if !self.state.can_transition_to(next) {
            tracing::debug!(
                epoch = %self.epoch,
                from = %self.state,
                to = %next,
                "ignoring invalid session transition"
            );
            return;
        }
        self.state = next;
        self.emit(SessionEvent::StateChanged { state: next, error });
    }

    fn emit(&self, event: SessionEvent) {
        // The owner dropping its receiver just means nobody is listening.
        let _ = self.sink.send(SessionMessage {
            epoch: self.epoch,
            event,
        });
    }
}

/// Owner's handle to a running session.
///
/// Dropping the handle closes the session.
pub struct SessionHandle {
    epoch: Epoch,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// The epoch every event from this session carries.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Asks the session to close. Idempotent, safe in any state.
    pub fn close(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }

    /// Returns `true` once the session task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the session task to exit.
    pub async fn wait(&mut self) {
        let _ = (&mut self.task).await;
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    //! Session tests over an in-memory connection.
    //!
    //! `MemoryConnection` plays the relay: the test pushes inbound frames
    //! through `relay_tx` and reads what the session wrote from `sent_rx`.

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use chatdraw_protocol::resolve;
    use chatdraw_transport::{ConnectionId, TransportError};
    use tokio::sync::Mutex;

    use super::*;

    enum Inbound {
        Frame(String),
        Reset,
    }

    struct MemoryConnection {
        inbound: Mutex<mpsc::UnboundedReceiver<Inbound>>,
        sent: mpsc::UnboundedSender<String>,
        closed: Arc<AtomicBool>,
    }

    impl Connection for MemoryConnection {
        async fn send(&self, text: &str) -> Result<(), TransportError> {
            self.sent.send(text.to_string()).map_err(|_| {
                TransportError::SendFailed(std::io::Error::other("relay gone"))
            })
        }

        async fn recv(&self) -> Result<Option<String>, TransportError> {
            match self.inbound.lock().await.recv().await {
                Some(Inbound::Frame(text)) => Ok(Some(text)),
                Some(Inbound::Reset) => Err(TransportError::ReceiveFailed(
                    std::io::Error::other("connection reset"),
                )),
                None => Ok(None),
            }
        }

        async fn close(&self) -> Result<(), TransportError> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn id(&self) -> ConnectionId {
            ConnectionId::new(1)
        }
    }

    enum DialPlan {
        Ready(std::sync::Mutex<Option<MemoryConnection>>),
        Refuse,
        Hang,
    }

    struct MemoryDialer(DialPlan);

    impl Dialer for MemoryDialer {
        type Connection = MemoryConnection;

        async fn dial(&self, url: &str) -> Result<MemoryConnection, TransportError> {
            let refused = || TransportError::DialFailed {
                url: url.to_string(),
                source: std::io::Error::other("refused"),
            };
            match &self.0 {
                DialPlan::Ready(slot) => {
                    let conn = slot.lock().expect("lock").take();
                    conn.ok_or_else(refused)
                }
                DialPlan::Refuse => Err(refused()),
                DialPlan::Hang => std::future::pending().await,
            }
        }
    }

    struct Harness {
        relay_tx: Option<mpsc::UnboundedSender<Inbound>>,
        sent_rx: mpsc::UnboundedReceiver<String>,
        events: mpsc::UnboundedReceiver<SessionMessage>,
        closed: Arc<AtomicBool>,
        handle: SessionHandle,
    }

    fn open_with(plan: impl FnOnce(MemoryConnection) -> DialPlan) -> Harness {
        let (relay_tx, relay_rx) = mpsc::unbounded_channel();
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let conn = MemoryConnection {
            inbound: Mutex::new(relay_rx),
            sent: sent_tx,
            closed: Arc::clone(&closed),
        };
        let (sink, events) = mpsc::unbounded_channel();
        let session = ProtocolSession::new(
            Arc::new(MemoryDialer(plan(conn))),
            SessionConfig::default(),
            resolve("ninja").unwrap(),
            Epoch::default().next(),
            sink,
        );
        Harness {
            relay_tx: Some(relay_tx),
            sent_rx,
            events,
            closed,
            handle: session.open(),
        }
    }

    impl Harness {
        fn push(&self, inbound: Inbound) {
            self.relay_tx
                .as_ref()
                .expect("relay still open")
                .send(inbound)
                .expect("session still reading");
        }

        fn push_frame(&self, frame: &str) {
            self.push(Inbound::Frame(frame.to_string()));
        }
    }

    fn open_ready() -> Harness {
        open_with(|conn| DialPlan::Ready(std::sync::Mutex::new(Some(conn))))
    }

    async fn next_event(h: &mut Harness) -> SessionEvent {
        let msg = tokio::time::timeout(Duration::from_secs(2), h.events.recv())
            .await
            .expect("event should arrive")
            .expect("sink open");
        assert_eq!(msg.epoch, Epoch::default().next());
        msg.event
    }

    async fn next_state(h: &mut Harness) -> (SessionState, Option<SessionError>) {
        match next_event(h).await {
            SessionEvent::StateChanged { state, error } => (state, error),
            other => panic!("expected state change, got {other:?}"),
        }
    }

    async fn next_sent(h: &mut Harness) -> String {
        tokio::time::timeout(Duration::from_secs(2), h.sent_rx.recv())
            .await
            .expect("write should arrive")
            .expect("connection open")
    }

    async fn joined() -> Harness {
        let mut h = open_ready();
        assert_eq!(next_state(&mut h).await.0, SessionState::Connecting);
        assert_eq!(next_state(&mut h).await.0, SessionState::Joined);
        h
    }

    #[tokio::test]
    async fn test_open_sends_handshake_in_one_write() {
        let mut h = joined().await;

        let login = next_sent(&mut h).await;
        let lines: Vec<&str> = login.split("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "PASS SCHMOOPIIE");
        assert!(lines[1].starts_with("NICK justinfan"));
        assert_eq!(lines[2], "JOIN #ninja");
        assert!(h.sent_rx.try_recv().is_err(), "handshake must be one write");
    }

    #[tokio::test]
    async fn test_ping_is_answered_and_not_emitted() {
        let mut h = joined().await;
        let _login = next_sent(&mut h).await;

        h.push_frame("PING :tmi.twitch.tv\r\n");
        assert_eq!(next_sent(&mut h).await, "PONG :tmi.twitch.tv");

        // The next event must be the chat line, not anything for the PING.
        h.push_frame(":bob!bob@bob.tmi.twitch.tv PRIVMSG #ninja :!join please\r\n");
        match next_event(&mut h).await {
            SessionEvent::Chat(chat) => {
                assert_eq!(chat.identity, "bob");
                assert_eq!(chat.text, "!join please");
            }
            other => panic!("expected chat, got {other:?}"),
        }
        assert!(h.sent_rx.try_recv().is_err(), "one PONG per PING");
    }

    #[tokio::test]
    async fn test_batched_frame_processes_lines_in_order() {
        let mut h = joined().await;
        let _login = next_sent(&mut h).await;

        h.push_frame(
            ":tmi.twitch.tv 001 justinfan1 :Welcome, GLHF!\r\n\
             :amy!amy@amy.tmi.twitch.tv PRIVMSG #ninja :first\r\n\
             PING :tmi.twitch.tv\r\n\
             :cid!cid@cid.tmi.twitch.tv PRIVMSG #ninja :second\r\n",
        );

        let mut texts = Vec::new();
        for _ in 0..2 {
            match next_event(&mut h).await {
                SessionEvent::Chat(chat) => texts.push((chat.identity, chat.text)),
                other => panic!("expected chat, got {other:?}"),
            }
        }
        assert_eq!(
            texts,
            vec![
                ("amy".to_string(), "first".to_string()),
                ("cid".to_string(), "second".to_string()),
            ]
        );
        assert_eq!(next_sent(&mut h).await, "PONG :tmi.twitch.tv");
    }

    #[tokio::test]
    async fn test_relay_close_moves_to_closed() {
        let mut h = joined().await;
        h.relay_tx = None;

        let (state, error) = next_state(&mut h).await;
        assert_eq!(state, SessionState::Closed);
        assert!(error.is_none());
        // The session answers the peer's close before reporting it.
        assert!(h.closed.load(Ordering::SeqCst));
        h.handle.wait().await;
        assert!(h.handle.is_finished());
    }

    #[tokio::test]
    async fn test_receive_error_moves_to_failed_with_error() {
        let mut h = joined().await;
        h.push(Inbound::Reset);

        let (state, error) = next_state(&mut h).await;
        assert_eq!(state, SessionState::Failed);
        assert!(matches!(
            error,
            Some(SessionError::Transport(TransportError::ReceiveFailed(_)))
        ));
    }

    #[tokio::test]
    async fn test_dial_failure_moves_to_failed() {
        let mut h = open_with(|_| DialPlan::Refuse);

        assert_eq!(next_state(&mut h).await.0, SessionState::Connecting);
        let (state, error) = next_state(&mut h).await;
        assert_eq!(state, SessionState::Failed);
        assert!(matches!(
            error,
            Some(SessionError::Transport(TransportError::DialFailed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_close_while_joined_closes_connection_once() {
        let mut h = joined().await;

        h.handle.close();
        h.handle.close();

        let (state, _) = next_state(&mut h).await;
        assert_eq!(state, SessionState::Closed);
        h.handle.wait().await;
        assert!(h.closed.load(Ordering::SeqCst));
        assert!(h.events.try_recv().is_err(), "no events after Closed");
    }

    #[tokio::test]
    async fn test_close_while_dialing_abandons_dial() {
        let mut h = open_with(|_| DialPlan::Hang);
        assert_eq!(next_state(&mut h).await.0, SessionState::Connecting);

        h.handle.close();

        assert_eq!(next_state(&mut h).await.0, SessionState::Closed);
        h.handle.wait().await;
    }

    #[tokio::test]
    async fn test_dropping_handle_closes_session() {
        let h = joined().await;
        let Harness { handle, mut events, .. } = h;
        drop(handle);

        let msg = tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("event should arrive")
            .expect("sink open");
        assert!(matches!(
            msg.event,
            SessionEvent::StateChanged { state: SessionState::Closed, .. }
        ));
    }
}

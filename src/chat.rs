//! Chat session manager: message log, connection lifecycle and error slot.
//!
//! `ChatSession` is a plain state machine with no browser types in it. The
//! socket layer (`app::chat_view`) feeds it lifecycle events and raw frames
//! and acts on the outcomes it returns, so every rule about ordering,
//! optimistic echo and error reconciliation is testable natively.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path appended to the ws(s) endpoint derived from the API base URL.
pub use crate::net::WS_CHAT_PATH;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the append-only message log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
}

/// Outbound wire frame: one per user submission.
#[derive(Debug, Serialize)]
pub struct PromptFrame<'a> {
    pub prompt: &'a str,
}

/// Inbound wire frame. Reply frames carry `role`/`content`/`id`, error frames
/// carry `error`; anything else is invalid and dropped.
#[derive(Debug, Deserialize)]
struct InboundFrame {
    role: Option<Role>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    id: Option<u64>,
}

/// Lifecycle of one socket instance. `Closed` and `Errored` are terminal for
/// the instance; reconnecting swaps in a fresh `Connecting` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Open,
    Closed,
    Errored,
}

/// User-surfaced error taxonomy. Only the most recent error is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Socket never reached open, or every reconnect attempt was spent.
    #[error("connection error")]
    ConnectFailed,
    /// An open socket errored or dropped.
    #[error("connection lost")]
    Transport,
    /// Frame was not valid JSON.
    #[error("message parse error")]
    Parse,
    /// Server-sent `error` field, shown verbatim.
    #[error("{0}")]
    Server(String),
    /// Send attempted while the socket is not open.
    #[error("not connected")]
    NotConnected,
    /// Send attempted while a reply is already outstanding.
    #[error("awaiting reply")]
    Busy,
}

impl ChatError {
    /// Translation key for the fixed messages; `Server` text is shown as-is.
    pub fn i18n_key(&self) -> Option<&'static str> {
        match self {
            ChatError::ConnectFailed | ChatError::Transport => Some("chat.errorConnection"),
            ChatError::Parse => Some("chat.errorParse"),
            ChatError::NotConnected => Some("chat.errorNotConnected"),
            ChatError::Busy => Some("chat.errorBusy"),
            ChatError::Server(_) => None,
        }
    }
}

/// What `send` decided; the socket layer only transmits on `Transmit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Message appended, JSON frame ready to go out.
    Transmit(String),
    /// Whitespace-only input, nothing happened.
    Ignored,
    /// A reply is still outstanding; nothing appended or sent.
    Busy,
    /// Message appended but the socket is not open; error surfaced instead.
    NotConnected,
}

/// What `handle_frame` did with an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Reply appended to the log.
    Appended,
    /// Server-sent error surfaced.
    ServerError,
    /// Frame was not JSON; parse error surfaced.
    Malformed,
    /// Valid JSON with neither `role` nor `error`; silently dropped.
    Dropped,
}

/// Capped exponential backoff for reconnecting a dead socket. Bounded so a
/// downed gateway does not get hammered forever; exhaustion leaves the
/// surfaced error standing until the user re-enters the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u32,
    pub max_delay_ms: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (0-based): base * 2^attempt,
    /// capped at `max_delay_ms`.
    pub fn delay_for(&self, attempt: u32) -> u32 {
        let shifted = self
            .base_delay_ms
            .checked_shl(attempt)
            .unwrap_or(self.max_delay_ms);
        shifted.min(self.max_delay_ms)
    }

    pub fn exhausted(&self, attempt: u32) -> bool {
        attempt >= self.max_attempts
    }
}

/// The session manager proper: one connection's worth of chat state.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    state: ConnectionState,
    awaiting_reply: bool,
    error: Option<ChatError>,
    next_id: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn error(&self) -> Option<&ChatError> {
        self.error.as_ref()
    }

    /// A (re)connect attempt has started; a fresh socket is in flight.
    pub fn connect_started(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// Handshake succeeded. Clears any prior error.
    pub fn opened(&mut self) {
        self.state = ConnectionState::Open;
        self.error = None;
    }

    /// Socket never reached open.
    pub fn open_failed(&mut self) {
        self.state = ConnectionState::Errored;
        self.error = Some(ChatError::ConnectFailed);
        self.awaiting_reply = false;
    }

    /// An open socket errored or dropped underneath us.
    pub fn transport_error(&mut self) {
        self.state = ConnectionState::Errored;
        self.error = Some(ChatError::Transport);
        self.awaiting_reply = false;
    }

    /// Orderly close (panel teardown or server shutdown). Any reply in flight
    /// is simply lost.
    pub fn closed(&mut self) {
        if self.state != ConnectionState::Errored {
            self.state = ConnectionState::Closed;
        }
        self.awaiting_reply = false;
    }

    /// Submit user input.
    ///
    /// Non-empty input is appended to the log immediately (optimistic echo,
    /// before any network interaction); only then does the outcome depend on
    /// the socket: open ⇒ a `{"prompt": …}` frame to transmit, otherwise a
    /// not-connected error with the echoed message left in place. A send while
    /// a reply is outstanding is rejected outright.
    pub fn send(&mut self, input: &str) -> SendOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }
        if self.awaiting_reply {
            self.error = Some(ChatError::Busy);
            return SendOutcome::Busy;
        }
        self.error = None;
        let id = self.fresh_id();
        self.messages.push(Message {
            id,
            role: Role::User,
            content: text.to_owned(),
        });
        if self.state != ConnectionState::Open {
            self.error = Some(ChatError::NotConnected);
            return SendOutcome::NotConnected;
        }
        match serde_json::to_string(&PromptFrame { prompt: text }) {
            Ok(frame) => {
                self.awaiting_reply = true;
                SendOutcome::Transmit(frame)
            }
            Err(_) => {
                self.error = Some(ChatError::Parse);
                SendOutcome::NotConnected
            }
        }
    }

    /// Classify and apply one raw inbound frame.
    pub fn handle_frame(&mut self, raw: &str) -> FrameOutcome {
        let frame: InboundFrame = match serde_json::from_str(raw) {
            Ok(frame) => frame,
            Err(_) => {
                self.error = Some(ChatError::Parse);
                self.awaiting_reply = false;
                return FrameOutcome::Malformed;
            }
        };
        if let Some(role) = frame.role {
            let id = frame.id.unwrap_or_else(|| self.fresh_id());
            self.next_id = self.next_id.max(id + 1);
            self.messages.push(Message {
                id,
                role,
                content: frame.content.unwrap_or_default(),
            });
            self.awaiting_reply = false;
            return FrameOutcome::Appended;
        }
        if let Some(text) = frame.error {
            self.error = Some(ChatError::Server(text));
            self.awaiting_reply = false;
            return FrameOutcome::ServerError;
        }
        FrameOutcome::Dropped
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_session() -> ChatSession {
        let mut session = ChatSession::new();
        session.connect_started();
        session.opened();
        session
    }

    #[test]
    fn send_appends_user_message_before_transmit() {
        let mut session = open_session();
        let frame = match session.send("  hello  ") {
            SendOutcome::Transmit(frame) => frame,
            other => panic!("expected transmit, got {other:?}"),
        };
        assert_eq!(frame, r#"{"prompt":"hello"}"#);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::User);
        assert_eq!(session.messages()[0].content, "hello");
        assert!(session.awaiting_reply());
    }

    #[test]
    fn whitespace_only_send_is_a_noop() {
        let mut session = open_session();
        assert_eq!(session.send("   \n\t "), SendOutcome::Ignored);
        assert!(session.messages().is_empty());
        assert!(!session.awaiting_reply());
        assert!(session.error().is_none());
    }

    #[test]
    fn send_while_not_open_surfaces_error_but_keeps_echo() {
        let mut session = ChatSession::new();
        assert_eq!(session.send("hello"), SendOutcome::NotConnected);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.error(), Some(&ChatError::NotConnected));
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn second_send_while_awaiting_is_rejected() {
        let mut session = open_session();
        assert!(matches!(session.send("one"), SendOutcome::Transmit(_)));
        assert_eq!(session.send("two"), SendOutcome::Busy);
        assert_eq!(session.messages().len(), 1, "no second echo appended");
        assert_eq!(session.error(), Some(&ChatError::Busy));
        assert!(session.awaiting_reply());
    }

    #[test]
    fn reply_frame_appends_and_clears_awaiting() {
        let mut session = open_session();
        session.send("hello");
        let outcome = session.handle_frame(r#"{"role":"assistant","content":"hi","id":2}"#);
        assert_eq!(outcome, FrameOutcome::Appended);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].role, Role::Assistant);
        assert_eq!(session.messages()[1].content, "hi");
        assert_eq!(session.messages()[1].id, 2);
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn malformed_frame_surfaces_parse_error() {
        let mut session = open_session();
        session.send("hello");
        assert_eq!(session.handle_frame("{not json"), FrameOutcome::Malformed);
        assert_eq!(session.messages().len(), 1, "nothing appended");
        assert_eq!(session.error(), Some(&ChatError::Parse));
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn error_frame_surfaces_server_text() {
        let mut session = open_session();
        session.send("hello");
        let outcome = session.handle_frame(r#"{"error":"model overloaded"}"#);
        assert_eq!(outcome, FrameOutcome::ServerError);
        assert_eq!(
            session.error(),
            Some(&ChatError::Server("model overloaded".into()))
        );
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn frame_with_neither_role_nor_error_is_dropped() {
        let mut session = open_session();
        session.send("hello");
        assert_eq!(session.handle_frame(r#"{"ping":1}"#), FrameOutcome::Dropped);
        assert_eq!(session.messages().len(), 1);
        assert!(session.error().is_none());
        assert!(session.awaiting_reply(), "drop does not consume the window");
    }

    #[test]
    fn open_clears_prior_error() {
        let mut session = ChatSession::new();
        session.open_failed();
        assert_eq!(session.error(), Some(&ChatError::ConnectFailed));
        session.connect_started();
        session.opened();
        assert!(session.error().is_none());
        assert!(session.is_open());
    }

    #[test]
    fn transport_error_is_terminal_until_reconnect() {
        let mut session = open_session();
        session.send("hello");
        session.transport_error();
        assert_eq!(session.state(), ConnectionState::Errored);
        assert!(!session.awaiting_reply());
        assert_eq!(session.send("again"), SendOutcome::NotConnected);
    }

    #[test]
    fn close_loses_in_flight_reply() {
        let mut session = open_session();
        session.send("hello");
        session.closed();
        assert_eq!(session.state(), ConnectionState::Closed);
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn message_ids_are_monotonic_across_sources() {
        let mut session = open_session();
        session.send("a");
        session.handle_frame(r#"{"role":"assistant","content":"b","id":7}"#);
        session.send("c");
        let ids: Vec<u64> = session.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids not monotonic: {ids:?}");
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for(0), 500);
        assert_eq!(policy.delay_for(1), 1_000);
        assert_eq!(policy.delay_for(2), 2_000);
        assert_eq!(policy.delay_for(4), 8_000);
        assert_eq!(policy.delay_for(10), 8_000);
        assert_eq!(policy.delay_for(40), 8_000, "shift overflow capped");
        assert!(!policy.exhausted(4));
        assert!(policy.exhausted(5));
    }

    #[test]
    fn hello_round_trip_scenario() {
        let mut session = open_session();
        assert!(matches!(session.send("hello"), SendOutcome::Transmit(_)));
        assert_eq!(session.messages().len(), 1);
        assert!(session.awaiting_reply());
        session.handle_frame(r#"{"role":"assistant","content":"hi","id":2}"#);
        let log: Vec<(Role, &str)> = session
            .messages()
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect();
        assert_eq!(
            log,
            vec![(Role::User, "hello"), (Role::Assistant, "hi")]
        );
        assert!(!session.awaiting_reply());
    }
}

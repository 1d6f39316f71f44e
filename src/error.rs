//! Error types for server queries and session operations.

use derive_more::{Display, Error, From};
use tracing::instrument;

/// Category of a failed server interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ProtocolErrorKind {
    /// Connection, IO or non-success HTTP status, including a connection
    /// closed before any reply.
    #[display("network failure")]
    NetworkFailure,
    /// The server answered with a body the client cannot read.
    #[display("malformed response")]
    MalformedResponse,
    /// No answer within the configured request timeout.
    #[display("timeout")]
    Timeout,
    /// The server answered, but the conversation broke the turn contract.
    #[display("protocol violation")]
    ProtocolViolation,
}

/// Server protocol error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{}: {} at {}:{}", kind, message, file, line)]
pub struct ProtocolError {
    /// What went wrong.
    pub kind: ProtocolErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProtocolError {
    /// Creates a new protocol error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: ProtocolErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a [`ProtocolErrorKind::NetworkFailure`].
    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::NetworkFailure, message)
    }

    /// Shorthand for a [`ProtocolErrorKind::MalformedResponse`].
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::MalformedResponse, message)
    }

    /// Shorthand for a [`ProtocolErrorKind::Timeout`].
    #[track_caller]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::Timeout, message)
    }

    /// Shorthand for a [`ProtocolErrorKind::ProtocolViolation`].
    #[track_caller]
    pub fn violation(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::ProtocolViolation, message)
    }

    /// Transient failures are worth another attempt; answers that came back wrong are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ProtocolErrorKind::NetworkFailure | ProtocolErrorKind::Timeout
        )
    }
}

// Conversion traits stay uninstrumented
impl From<reqwest::Error> for ProtocolError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(format!("Request timed out: {}", err))
        } else if err.is_decode() {
            Self::malformed(format!("Unreadable response body: {}", err))
        } else {
            Self::network(format!("HTTP request failed: {}", err))
        }
    }
}

/// Error returned by session-mutating operations.
#[derive(Debug, Clone, Display, Error, From)]
pub enum SessionError {
    /// Another move submission or CPU turn is still outstanding.
    #[display("a turn is already in progress")]
    Busy,
    /// Coordinates outside the 8x8 board.
    #[display("position ({row}, {col}) is off the board")]
    InvalidPosition {
        /// Requested row.
        row: u8,
        /// Requested column.
        col: u8,
    },
    /// The server conversation failed.
    #[display("{_0}")]
    #[from]
    Protocol(ProtocolError),
}

impl SessionError {
    /// Returns the protocol error kind, if this is a protocol failure.
    pub fn protocol_kind(&self) -> Option<ProtocolErrorKind> {
        match self {
            SessionError::Protocol(err) => Some(err.kind),
            _ => None,
        }
    }
}

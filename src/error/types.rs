//! Error types for the stim client.

use thiserror::Error;

/// Main error type for client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Connection establishment errors (resolve failure, refused, timeout).
    #[error("Connect error: {message}")]
    Connect { message: String },

    /// Socket-level write failure.
    #[error("Write error: {message}")]
    Write { message: String },

    /// Socket-level read failure.
    #[error("Read error: {message}")]
    Read { message: String },

    /// No complete reply arrived within the reply timeout.
    ///
    /// The connection is poisoned after a timeout: the peer may still send
    /// the late reply, which would be mismatched against the next request.
    /// Callers must close and reopen.
    #[error("Reply timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// Protocol errors.
    #[error("Protocol error: {kind}")]
    Protocol { kind: ProtocolErrorKind },

    /// Session operation attempted before `connect` or after `close`.
    #[error("Session not initialized")]
    NotInitialized,

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Protocol error kinds.
#[derive(Error, Debug)]
pub enum ProtocolErrorKind {
    /// Outbound request would exceed the frame limit. Nothing is written,
    /// so the connection remains usable.
    #[error("Message too large: {size} bytes exceeds maximum of {max} bytes")]
    MessageTooLarge { size: usize, max: usize },

    /// Inbound reply grew past the frame limit with no terminator. The
    /// request was already written and unterminated peer bytes remain in
    /// flight, so the connection is unusable.
    #[error("Reply too large: {size} bytes buffered without a terminator, maximum is {max} bytes")]
    ReplyTooLarge { size: usize, max: usize },

    #[error("Message contains the terminator byte 0x{terminator:02x}")]
    EmbeddedTerminator { terminator: u8 },

    #[error("Invalid reply: {message}")]
    InvalidReply { message: String },

    #[error("Connection closed by peer")]
    ConnectionClosed,
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Whether the error leaves the connection unusable.
    ///
    /// Fatal means the byte stream position is no longer known (partial
    /// write, abandoned reply, peer close) and the connection must not
    /// carry another exchange.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ClientError::Write { .. }
                | ClientError::Read { .. }
                | ClientError::Timeout { .. }
                | ClientError::Io(_)
                | ClientError::Protocol {
                    kind: ProtocolErrorKind::ConnectionClosed
                        | ProtocolErrorKind::ReplyTooLarge { .. }
                }
        )
    }
}

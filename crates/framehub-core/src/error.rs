//! Shared error type across framehub crates.

use thiserror::Error;

/// Stable error codes surfaced in telemetry labels and SDK diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Inbound text that does not parse as an envelope.
    BadEnvelope,
    /// Valid envelope whose `event` has no registered handler.
    UnknownCommand,
    /// Sender origin not on the host allowlist.
    OriginRejected,
    /// Invalid arguments or malformed payload fields.
    BadRequest,
    /// Session bootstrap ended in a terminal failure.
    HandshakeFailed,
    /// A request/response wait expired.
    RpcTimeout,
    /// The underlying channel is gone.
    ChannelClosed,
    /// Internal host error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadEnvelope => "BAD_ENVELOPE",
            ErrorCode::UnknownCommand => "UNKNOWN_COMMAND",
            ErrorCode::OriginRejected => "ORIGIN_REJECTED",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::HandshakeFailed => "HANDSHAKE_FAILED",
            ErrorCode::RpcTimeout => "RPC_TIMEOUT",
            ErrorCode::ChannelClosed => "CHANNEL_CLOSED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FrameHubError>;

/// Unified error type used by core, host, and client.
#[derive(Debug, Error)]
pub enum FrameHubError {
    #[error("bad envelope: {0}")]
    BadEnvelope(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("origin rejected: {0}")]
    OriginRejected(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),
    #[error("rpc timeout waiting for {event} after {waited_ms}ms")]
    RpcTimeout { event: String, waited_ms: u64 },
    #[error("channel closed")]
    ChannelClosed,
    #[error("internal: {0}")]
    Internal(String),
}

impl FrameHubError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            FrameHubError::BadEnvelope(_) => ErrorCode::BadEnvelope,
            FrameHubError::UnknownCommand(_) => ErrorCode::UnknownCommand,
            FrameHubError::OriginRejected(_) => ErrorCode::OriginRejected,
            FrameHubError::BadRequest(_) => ErrorCode::BadRequest,
            FrameHubError::HandshakeFailed(_) => ErrorCode::HandshakeFailed,
            FrameHubError::RpcTimeout { .. } => ErrorCode::RpcTimeout,
            FrameHubError::ChannelClosed => ErrorCode::ChannelClosed,
            FrameHubError::Internal(_) => ErrorCode::Internal,
        }
    }
}

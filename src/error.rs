//! Error taxonomy for the explorer client.
//!
//! Callers need to tell a failed request apart from a well-formed "no such
//! thing" answer, so the gateway returns typed errors instead of a blanket
//! error chain.

use thiserror::Error;

/// Failure of a single gateway request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure or non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response arrived but could not be parsed into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn transport(e: impl std::fmt::Display) -> Self {
        FetchError::Transport(e.to_string())
    }

    pub fn decode(e: impl std::fmt::Display) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Push-channel failure. Always recoverable: the channel task schedules a
/// reconnect and keeps running, it never terminates the session.
#[derive(Debug, Error)]
#[error("channel error: {0}")]
pub struct ChannelError(pub String);

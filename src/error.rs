//! Unified error types for the bridge core.
//!
//! A single `Error` enum that every subsystem can convert into. All variants
//! are `Copy` so they can be logged and dropped on the tick thread without
//! allocation. Nothing in this crate propagates an error into the host's
//! update loop: the router and providers log and carry on.

use core::fmt;

use crate::channel::ChannelId;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An inbound frame arrived on a channel this core does not handle.
    UnknownChannel(u8),
    /// A command that needs at least one payload byte arrived empty.
    EmptyPayload(ChannelId),
    /// The outbound link rejected a frame.
    Link(LinkError),
    /// The extended group backend failed.
    Backend(BackendError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChannel(id) => write!(f, "unknown inbound channel {id}"),
            Self::EmptyPayload(ch) => write!(f, "empty payload on channel {}", ch.0),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Backend(e) => write!(f, "extended backend: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The outbound queue is full; the frame was not accepted.
    QueueFull,
    /// The payload exceeds the protocol's maximum payload size.
    PayloadTooLarge,
    /// The addressed peer is no longer connected.
    Disconnected,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => write!(f, "outbound queue full"),
            Self::PayloadTooLarge => write!(f, "payload too large"),
            Self::Disconnected => write!(f, "peer disconnected"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Extended backend errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendError {
    /// The backend is not loaded in this session.
    Missing,
    /// The backend raised an error while handling the call.
    CallFailed,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "backend missing"),
            Self::CallFailed => write!(f, "backend call failed"),
        }
    }
}

impl From<BackendError> for Error {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

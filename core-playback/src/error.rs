//! # Playback Error Types
//!
//! Failures surfaced by control calls. Every variant carries the message
//! that was logged and published on the event bus.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors returned from [`ControlBundle`](crate::ControlBundle) calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Bad input: blank URL, non-finite seek position, missing track or a
    /// stale control bundle.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The native player has not reached a state that allows the call.
    #[error("Player not ready: {0}")]
    NotReady(String),

    /// The native player raised an error. The message is passed through
    /// verbatim.
    #[error("Native player failure: {0}")]
    NativeFailure(String),

    /// The reconciler has shut down.
    #[error("Player has shut down")]
    ShutDown,

    #[error("Unknown playback error: {0}")]
    Unknown(String),
}

impl PlaybackError {
    /// Category name used in logs and `PlaybackEvent::Error`.
    pub fn kind(&self) -> &'static str {
        match self {
            PlaybackError::InvalidArgument(_) => "InvalidArgument",
            PlaybackError::NotReady(_) => "NotReady",
            PlaybackError::NativeFailure(_) => "NativeFailure",
            PlaybackError::ShutDown => "ShutDown",
            PlaybackError::Unknown(_) => "Unknown",
        }
    }

    /// Message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            PlaybackError::InvalidArgument(msg)
            | PlaybackError::NotReady(msg)
            | PlaybackError::NativeFailure(msg)
            | PlaybackError::Unknown(msg) => msg,
            PlaybackError::ShutDown => "player has shut down",
        }
    }
}

impl From<BridgeError> for PlaybackError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::InvalidArgument(msg) => PlaybackError::InvalidArgument(msg),
            // A released module behaves like one that never loaded.
            BridgeError::NotReady(msg) | BridgeError::NotAvailable(msg) => {
                PlaybackError::NotReady(msg)
            }
            BridgeError::NativeFailure(msg) => PlaybackError::NativeFailure(msg),
            BridgeError::Unknown(msg) => PlaybackError::Unknown(msg),
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

use thiserror::Error;

/// Failure reported by a native audio module.
///
/// The variants mirror the rejection codes the host bridges surface:
/// argument validation, calls that arrive before the native player is
/// ready, and errors raised by the native player itself. Messages from the
/// native player are carried verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Native player not ready: {0}")]
    NotReady(String),

    #[error("Native player failure: {0}")]
    NativeFailure(String),

    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Unknown bridge error: {0}")]
    Unknown(String),
}

impl BridgeError {
    /// Stable code for the error, as reported to the JS side of a host bridge.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::InvalidArgument(_) => "E_INVALID_ARGUMENT",
            BridgeError::NotReady(_) => "E_NOT_READY",
            BridgeError::NativeFailure(_) => "E_NATIVE_FAILURE",
            BridgeError::NotAvailable(_) => "E_NOT_AVAILABLE",
            BridgeError::Unknown(_) => "E_UNKNOWN",
        }
    }

    /// Message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            BridgeError::InvalidArgument(msg)
            | BridgeError::NotReady(msg)
            | BridgeError::NativeFailure(msg)
            | BridgeError::NotAvailable(msg)
            | BridgeError::Unknown(msg) => msg,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

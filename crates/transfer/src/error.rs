//! Error payloads carried by failed transfers.
//!
//! - [`TransferError`] is the `{message, cause}` pair every failure holds.
//! - [`FailureCause`] is the stand-in cause vocabulary used when a failure is
//!   built from a message alone, and the shape panics are reported in.
//! - [`GatewayError`] is one entry of a batched upstream error response.
//! - [`SetupError`] is returned by the write-once process setup.
use std::{error::Error, fmt, io, sync::Arc};

use serde::Deserialize;
use thiserror::Error;

/// Owned, thread-safe error accepted by every fallible entry point.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Shared reference to the underlying failure of a transfer.
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

pub(crate) const DEFAULT_MESSAGE: &str = "Unknown exception appeared in Transfer.";

/// Stand-in causes, one per failure family.
#[derive(Error, Debug)]
pub enum FailureCause {
    #[error("{0}")]
    Canceled(String),
    #[error("{0}")]
    UnknownHost(String),
    #[error("{0}")]
    ConnectionRefused(String),
    #[error("{0}")]
    SocketTimeout(String),
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    InterruptedIo(String),
    #[error("{0}")]
    Tls(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    IllegalState(String),
    #[error("{0}")]
    Security(String),
    #[error("panicked: {0}")]
    Panic(String),
}

impl FailureCause {
    pub(crate) fn io(kind: io::ErrorKind, message: &str) -> Self {
        Self::Io(io::Error::new(kind, message.to_string()))
    }
}

/// Message and underlying cause of a failed transfer.
///
/// The cause is never absent: when none is supplied an
/// [`FailureCause::IllegalState`] marker takes its place, so logging code can
/// always dereference it.
#[derive(Clone)]
pub struct TransferError {
    message: String,
    cause: Cause,
}

impl TransferError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: Arc::new(FailureCause::IllegalState(DEFAULT_MESSAGE.to_string())),
        }
    }

    /// Build an error whose message is the rendered cause.
    pub fn from_cause(cause: impl Into<BoxError>) -> Self {
        let cause: Cause = Arc::from(cause.into());
        let message = cause.to_string();
        Self {
            message: if message.trim().is_empty() {
                DEFAULT_MESSAGE.to_string()
            } else {
                message
            },
            cause,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Arc::from(cause.into());
        self
    }

    pub(crate) fn with_shared_cause(mut self, cause: Cause) -> Self {
        self.cause = cause;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// Downcast the cause to a concrete error type.
    pub fn cause_as<E: Error + 'static>(&self) -> Option<&E> {
        self.cause.downcast_ref::<E>()
    }
}

impl fmt::Debug for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferError")
            .field("message", &self.message)
            .field("cause", &self.cause.to_string())
            .finish()
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.cause)
    }
}

impl PartialEq for TransferError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.cause.to_string() == other.cause.to_string()
    }
}

/// One entry of a batched upstream error response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayError {
    pub message: String,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub classification: String,
}

/// Failures of the write-once process setup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SetupError {
    #[error("a transfer logger is already installed")]
    LoggerInstalled,
    #[error("the transfer configuration is already initialized")]
    ConfigInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cause_is_illegal_state() {
        let err = TransferError::new("boom");
        assert_eq!(err.message(), "boom");
        assert!(matches!(
            err.cause_as::<FailureCause>(),
            Some(FailureCause::IllegalState(_))
        ));
    }

    #[test]
    fn blank_cause_falls_back_to_default_message() {
        let err = TransferError::from_cause(FailureCause::Canceled(String::new()));
        assert_eq!(err.message(), DEFAULT_MESSAGE);
    }

    #[test]
    fn equality_compares_rendered_causes() {
        let a = TransferError::new("x").with_cause(FailureCause::Timeout("late".into()));
        let b = TransferError::new("x").with_cause(FailureCause::Timeout("late".into()));
        let c = TransferError::new("x").with_cause(FailureCause::Timeout("later".into()));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn gateway_error_deserializes_without_code() {
        let err: GatewayError =
            serde_json::from_str(r#"{"message":"bad","classification":"ValidationError"}"#)
                .unwrap();
        assert_eq!(err.code, None);
        assert_eq!(err.classification, "ValidationError");
    }
}

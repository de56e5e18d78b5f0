//! The closed taxonomy every [`Transfer`](crate::Transfer) is labelled with.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a transfer outcome.
///
/// [`TransferStatus::Success`] is reserved for successful transfers; every
/// failure carries exactly one of the remaining members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    AuthorizationError,
    Canceled,
    GeneralError,
    IoError,
    NetworkError,
    NotFound,
    ResourceConflict,
    Success,
    TimeoutError,
    UserError,
}

impl TransferStatus {
    pub const ALL: [TransferStatus; 10] = [
        Self::AuthorizationError,
        Self::Canceled,
        Self::GeneralError,
        Self::IoError,
        Self::NetworkError,
        Self::NotFound,
        Self::ResourceConflict,
        Self::Success,
        Self::TimeoutError,
        Self::UserError,
    ];

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    /// Stable upper-case name, the same one used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationError => "AUTHORIZATION_ERROR",
            Self::Canceled => "CANCELED",
            Self::GeneralError => "GENERAL_ERROR",
            Self::IoError => "IO_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::ResourceConflict => "RESOURCE_CONFLICT",
            Self::Success => "SUCCESS",
            Self::TimeoutError => "TIMEOUT_ERROR",
            Self::UserError => "USER_ERROR",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! The result type at the root of the crate.
//!
//! A [`Transfer`] is produced once per fallible operation and never mutated
//! afterwards; combinators consume it and build a new one.
use std::{any::Any, io};

use crate::{
    classify::ExceptionClassifier,
    error::{BoxError, FailureCause, GatewayError, TransferError},
    status::TransferStatus,
};

/// Outcome of a fallible operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Transfer<T> {
    Success(T),
    Failure(Failure),
}

/// Failed outcome: a non-success status plus its error.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    status: TransferStatus,
    error: TransferError,
}

impl Failure {
    /// A `Success` status is not a failure; it is normalised to
    /// [`TransferStatus::GeneralError`].
    pub fn new(status: TransferStatus, error: TransferError) -> Self {
        let status = match status {
            TransferStatus::Success => TransferStatus::GeneralError,
            status => status,
        };
        Self { status, error }
    }

    pub fn status(&self) -> TransferStatus {
        self.status
    }

    pub fn error(&self) -> &TransferError {
        &self.error
    }

    pub fn message(&self) -> &str {
        self.error.message()
    }

    pub fn into_parts(self) -> (TransferStatus, TransferError) {
        (self.status, self.error)
    }

    /// Classify an arbitrary error with the process-wide classifier.
    pub fn from_error(error: impl Into<BoxError>) -> Self {
        ExceptionClassifier::global().classify(error)
    }

    /// Classify a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::from_error(FailureCause::Panic(panic_message(&*payload)))
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Failure happened while transforming data".to_string()
    }
}

impl<T> From<Failure> for Transfer<T> {
    fn from(failure: Failure) -> Self {
        Transfer::Failure(failure)
    }
}

impl<T, E> From<Result<T, E>> for Transfer<T>
where
    E: Into<BoxError>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Transfer::Success(data),
            Err(err) => Transfer::Failure(Failure::from_error(err)),
        }
    }
}

/// Generates a `name(message)` / `name_with(message, cause)` constructor pair
/// per failure status.
macro_rules! failure_constructors {
    ($(
        $(#[$doc:meta])*
        $name:ident, $with:ident => $status:ident, |$message:ident| $default:expr;
    )+) => {
        impl<T> Transfer<T> {
            $(
                $(#[$doc])*
                pub fn $name(message: impl Into<String>) -> Self {
                    let $message: String = message.into();
                    let cause = $default;
                    Self::$with($message, cause)
                }

                pub fn $with(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
                    Self::failure(
                        TransferStatus::$status,
                        TransferError::new(message).with_cause(cause),
                    )
                }
            )+
        }
    };
}

failure_constructors! {
    /// Unexpected failure; defaults the cause to an illegal-state marker.
    general_error, general_error_with => GeneralError,
        |message| FailureCause::IllegalState(message.clone());
    /// Unreachable peer; defaults the cause to a refused connection.
    network_error, network_error_with => NetworkError,
        |message| FailureCause::ConnectionRefused(message.clone());
    timeout_error, timeout_error_with => TimeoutError,
        |message| FailureCause::Timeout(message.clone());
    io_error, io_error_with => IoError,
        |message| FailureCause::io(io::ErrorKind::Other, &message);
    canceled, canceled_with => Canceled,
        |message| FailureCause::Canceled(message.clone());
    user_error, user_error_with => UserError,
        |message| FailureCause::IllegalState(message.clone());
    authorization_error, authorization_error_with => AuthorizationError,
        |message| FailureCause::Security(message.clone());
    not_found, not_found_with => NotFound,
        |message| FailureCause::io(io::ErrorKind::NotFound, &message);
    resource_conflict_error, resource_conflict_error_with => ResourceConflict,
        |message| FailureCause::io(io::ErrorKind::Other, &message);
}

impl<T> Transfer<T> {
    pub fn success(data: T) -> Self {
        Transfer::Success(data)
    }

    pub fn failure(status: TransferStatus, error: TransferError) -> Self {
        Transfer::Failure(Failure::new(status, error))
    }

    /// Classify an arbitrary error into a failed transfer.
    pub fn from_error(error: impl Into<BoxError>) -> Self {
        Transfer::Failure(Failure::from_error(error))
    }

    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Transfer::Failure(Failure::from_panic(payload))
    }

    /// Collapse a batched upstream error list into one failure, reporting
    /// anomalies to the process-wide logger.
    ///
    /// See [`ExceptionClassifier::gateway_failure`].
    pub fn gateway_error(errors: &[GatewayError]) -> Self {
        Transfer::Failure(ExceptionClassifier::global().gateway_failure(errors))
    }

    pub fn status(&self) -> TransferStatus {
        match self {
            Transfer::Success(_) => TransferStatus::Success,
            Transfer::Failure(failure) => failure.status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Transfer::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Transfer::Failure(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Transfer::Success(data) => Some(data),
            Transfer::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&TransferError> {
        match self {
            Transfer::Success(_) => None,
            Transfer::Failure(failure) => Some(&failure.error),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Transfer::Success(data) => Some(data),
            Transfer::Failure(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Transfer::Success(data) => Ok(data),
            Transfer::Failure(failure) => Err(failure),
        }
    }

    pub fn as_ref(&self) -> Transfer<&T> {
        match self {
            Transfer::Success(data) => Transfer::Success(data),
            Transfer::Failure(failure) => Transfer::Failure(failure.clone()),
        }
    }
}

impl Transfer<()> {
    /// A successful transfer without payload.
    pub fn empty() -> Self {
        Transfer::Success(())
    }
}

/// The first failure in iteration order wins; otherwise all values are kept
/// in order.
impl<T> FromIterator<Transfer<T>> for Transfer<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Transfer<T>>>(iter: I) -> Self {
        let mut values = Vec::new();
        for transfer in iter {
            match transfer {
                Transfer::Success(data) => values.push(data),
                Transfer::Failure(failure) => return Transfer::Failure(failure),
            }
        }
        Transfer::Success(values)
    }
}

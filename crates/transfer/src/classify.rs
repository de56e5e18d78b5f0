//! Maps arbitrary failures onto the [`TransferStatus`] taxonomy.
use std::{error::Error, io, sync::Arc, time::Duration};

use crate::{
    error::{BoxError, Cause, FailureCause, GatewayError, TransferError},
    logger::{self, TransferLogger},
    status::TransferStatus,
    transfer::Failure,
};

const TAG: &str = "Transfer::from_error";
const GATEWAY_TAG: &str = "Transfer::gateway_error";
const TIMEOUT_TAG: &str = "Transfer::timeout";

/// Result of recognising one node of an error chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Canceled,
    Network,
    SocketTimeout,
    InterruptedIo,
    Timeout,
    Io,
    General,
}

impl Kind {
    fn status(self) -> TransferStatus {
        match self {
            Kind::Canceled => TransferStatus::Canceled,
            Kind::Network => TransferStatus::NetworkError,
            Kind::SocketTimeout | Kind::InterruptedIo | Kind::Timeout => {
                TransferStatus::TimeoutError
            }
            Kind::Io => TransferStatus::IoError,
            Kind::General => TransferStatus::GeneralError,
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Kind::Canceled => "Transfer has been canceled",
            Kind::Network => "Handling Unknown Host Error",
            Kind::SocketTimeout => "Handling Socket Timeout",
            Kind::InterruptedIo => "Handling Interrupted IO Error",
            Kind::Timeout => "Handling Timeout",
            Kind::Io => "Handling IO Error",
            Kind::General => "Failure happened while transforming data",
        }
    }

    /// Expected churn is logged at info, the rest at error.
    fn is_expected(self) -> bool {
        self != Kind::General
    }
}

/// Classifies failures and reports each classification to a logger.
///
/// Classification itself is a pure function of the failure's type; the
/// logger only observes it.
#[derive(Clone, Default)]
pub struct ExceptionClassifier {
    logger: Option<Arc<dyn TransferLogger>>,
}

impl ExceptionClassifier {
    pub fn new(logger: Arc<dyn TransferLogger>) -> Self {
        Self {
            logger: Some(logger),
        }
    }

    /// A classifier that logs nothing.
    pub fn silent() -> Self {
        Self::default()
    }

    /// A classifier backed by the process-wide logger, if one is installed.
    pub fn global() -> Self {
        Self {
            logger: logger::installed().cloned(),
        }
    }

    /// The status `error` maps to, without logging.
    pub fn status_of(error: &(dyn Error + 'static)) -> TransferStatus {
        kind_of_chain(error).status()
    }

    pub fn classify(&self, error: impl Into<BoxError>) -> Failure {
        let cause: Cause = Arc::from(error.into());
        let kind = kind_of_chain(&*cause);

        let rendered = cause.to_string();
        let message = if rendered.trim().is_empty() {
            kind.default_message().to_string()
        } else {
            rendered
        };

        if let Some(logger) = &self.logger {
            if kind.is_expected() {
                logger.info(&message, &*cause, Some(TAG));
            } else {
                logger.error(&message, &*cause, Some(TAG));
            }
        }

        Failure::new(
            kind.status(),
            TransferError::new(message).with_shared_cause(cause),
        )
    }

    /// Collapse a batched upstream error list into one failure.
    ///
    /// Only the first entry drives the status; extra entries are reported as
    /// an anomaly and otherwise dropped.
    pub fn gateway_failure(&self, errors: &[GatewayError]) -> Failure {
        let Some(first) = errors.first() else {
            let cause = FailureCause::IllegalState("No gateway errors found.".to_string());
            if let Some(logger) = &self.logger {
                logger.error("No errors found. Should never happen.", &cause, Some(GATEWAY_TAG));
            }
            return Failure::new(
                TransferStatus::IoError,
                TransferError::new("No gateway errors found.").with_cause(cause),
            );
        };

        if errors.len() > 1
            && let Some(logger) = &self.logger
        {
            let cause =
                FailureCause::IllegalState(format!("receive more than one error: {errors:?}"));
            logger.error("More than one error message", &cause, Some(GATEWAY_TAG));
        }

        let status = match first.code {
            Some(400 | 403 | 405) => TransferStatus::UserError,
            Some(401) => TransferStatus::AuthorizationError,
            Some(404) => TransferStatus::NotFound,
            Some(409) => TransferStatus::ResourceConflict,
            _ => TransferStatus::GeneralError,
        };

        Failure::new(
            status,
            TransferError::new(first.message.clone())
                .with_cause(FailureCause::IllegalState(first.message.clone())),
        )
    }

    /// The failure reported when a bounded wait of `budget` expires.
    pub fn timeout_failure(&self, budget: Duration) -> Failure {
        let message = format!(
            "Failure happened due to Timeout ({} ms)",
            budget.as_millis()
        );
        let cause = FailureCause::Timeout(message.clone());
        if let Some(logger) = &self.logger {
            logger.info(&message, &cause, Some(TIMEOUT_TAG));
        }
        Failure::new(
            TransferStatus::Canceled,
            TransferError::new(message).with_cause(cause),
        )
    }
}

fn kind_of_chain(error: &(dyn Error + 'static)) -> Kind {
    recognise_chain(error).unwrap_or(Kind::General)
}

/// Walk the `source()` chain; the first recognised node decides.
fn recognise_chain(error: &(dyn Error + 'static)) -> Option<Kind> {
    let mut node = Some(error);
    while let Some(current) = node {
        if let Some(kind) = recognise(current) {
            return Some(kind);
        }
        node = current.source();
    }
    None
}

fn recognise(error: &(dyn Error + 'static)) -> Option<Kind> {
    if let Some(cause) = error.downcast_ref::<FailureCause>() {
        return Some(match cause {
            FailureCause::Canceled(_) => Kind::Canceled,
            FailureCause::UnknownHost(_) | FailureCause::ConnectionRefused(_) => Kind::Network,
            FailureCause::SocketTimeout(_) => Kind::SocketTimeout,
            FailureCause::Timeout(_) => Kind::Timeout,
            FailureCause::InterruptedIo(_) => Kind::InterruptedIo,
            FailureCause::Tls(_) => Kind::Io,
            FailureCause::Io(err) => kind_of_io(err),
            FailureCause::IllegalState(_) | FailureCause::Security(_) | FailureCause::Panic(_) => {
                Kind::General
            }
        });
    }
    if let Some(err) = error.downcast_ref::<io::Error>() {
        return Some(kind_of_io(err));
    }
    if error.is::<tokio::time::error::Elapsed>() {
        return Some(Kind::Timeout);
    }
    if error.is::<tokio::sync::oneshot::error::RecvError>() {
        return Some(Kind::Canceled);
    }
    if let Some(err) = error.downcast_ref::<tokio::task::JoinError>() {
        return Some(if err.is_cancelled() {
            Kind::Canceled
        } else {
            Kind::General
        });
    }
    if error.is::<serde_json::Error>() {
        return Some(Kind::Io);
    }
    #[cfg(feature = "reqwest")]
    if let Some(err) = error.downcast_ref::<reqwest::Error>() {
        return Some(if err.is_timeout() {
            Kind::Timeout
        } else if err.is_connect() {
            Kind::Network
        } else {
            Kind::Io
        });
    }
    None
}

/// A custom inner error, or anything in its chain, decides before the error
/// kind does.
fn kind_of_io(err: &io::Error) -> Kind {
    if let Some(inner) = err.get_ref()
        && let Some(kind) = recognise_chain(inner)
    {
        return kind;
    }
    match err.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::HostUnreachable
        | io::ErrorKind::NetworkUnreachable
        | io::ErrorKind::AddrNotAvailable => Kind::Network,
        io::ErrorKind::TimedOut => Kind::SocketTimeout,
        io::ErrorKind::Interrupted => Kind::InterruptedIo,
        _ => Kind::Io,
    }
}

//! Pluggable logging for the classifier.
//!
//! A logger is installed at most once per process. Until one is installed
//! every log call made by the crate is skipped.
use std::{
    error::Error,
    sync::{Arc, OnceLock},
};

use crate::error::SetupError;

static LOGGER: OnceLock<Arc<dyn TransferLogger>> = OnceLock::new();

/// Severity-split sink used when failures are classified.
pub trait TransferLogger: Send + Sync {
    fn verbose(&self, message: &str, cause: &(dyn Error + 'static), tag: Option<&str>);

    fn debug(&self, message: &str, cause: &(dyn Error + 'static), tag: Option<&str>);

    fn info(&self, message: &str, cause: &(dyn Error + 'static), tag: Option<&str>);

    fn warn(&self, message: &str, cause: &(dyn Error + 'static), tag: Option<&str>);

    fn error(&self, message: &str, cause: &(dyn Error + 'static), tag: Option<&str>);
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl TransferLogger for NoopLogger {
    fn verbose(&self, _: &str, _: &(dyn Error + 'static), _: Option<&str>) {}

    fn debug(&self, _: &str, _: &(dyn Error + 'static), _: Option<&str>) {}

    fn info(&self, _: &str, _: &(dyn Error + 'static), _: Option<&str>) {}

    fn warn(&self, _: &str, _: &(dyn Error + 'static), _: Option<&str>) {}

    fn error(&self, _: &str, _: &(dyn Error + 'static), _: Option<&str>) {}
}

/// Forwards to the `tracing` macros; `verbose` maps to `trace`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

const DEFAULT_TAG: &str = "transfer";

impl TransferLogger for TracingLogger {
    fn verbose(&self, message: &str, cause: &(dyn Error + 'static), tag: Option<&str>) {
        tracing::trace!(tag = tag.unwrap_or(DEFAULT_TAG), cause = %cause, "{message}");
    }

    fn debug(&self, message: &str, cause: &(dyn Error + 'static), tag: Option<&str>) {
        tracing::debug!(tag = tag.unwrap_or(DEFAULT_TAG), cause = %cause, "{message}");
    }

    fn info(&self, message: &str, cause: &(dyn Error + 'static), tag: Option<&str>) {
        tracing::info!(tag = tag.unwrap_or(DEFAULT_TAG), cause = %cause, "{message}");
    }

    fn warn(&self, message: &str, cause: &(dyn Error + 'static), tag: Option<&str>) {
        tracing::warn!(tag = tag.unwrap_or(DEFAULT_TAG), cause = %cause, "{message}");
    }

    fn error(&self, message: &str, cause: &(dyn Error + 'static), tag: Option<&str>) {
        tracing::error!(tag = tag.unwrap_or(DEFAULT_TAG), cause = %cause, "{message}");
    }
}

/// Install the process-wide logger. Only the first call wins.
pub fn install(logger: Arc<dyn TransferLogger>) -> Result<(), SetupError> {
    LOGGER.set(logger).map_err(|_| SetupError::LoggerInstalled)
}

pub fn installed() -> Option<&'static Arc<dyn TransferLogger>> {
    LOGGER.get()
}

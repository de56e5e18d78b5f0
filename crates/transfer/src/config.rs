//! Process-wide tunables, written once at startup.
use std::{sync::OnceLock, time::Duration};

use serde::Deserialize;

use crate::error::SetupError;

static CONFIG: OnceLock<TransferConfig> = OnceLock::new();

const DEFAULT_CALLBACK_TIMEOUT_MS: u64 = 20_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Budget used by [`Transfer::from_callback`](crate::Transfer::from_callback).
    pub callback_timeout_ms: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            callback_timeout_ms: DEFAULT_CALLBACK_TIMEOUT_MS,
        }
    }
}

impl TransferConfig {
    pub fn callback_timeout(&self) -> Duration {
        Duration::from_millis(self.callback_timeout_ms)
    }
}

pub fn init(config: TransferConfig) -> Result<(), SetupError> {
    CONFIG.set(config).map_err(|_| SetupError::ConfigInitialized)
}

/// The installed configuration, or the defaults when nothing was installed.
pub fn current() -> TransferConfig {
    CONFIG.get().cloned().unwrap_or_default()
}

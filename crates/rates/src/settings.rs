//! Settings are read from an optional TOML file, then `RATES__*` environment
//! variables, then command-line flags; later sources win.
use clap::Parser;
use serde::Deserialize;
use transfer::config::TransferConfig;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/rates.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Log level used for the `rates` and `transfer` targets.
    pub level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RatesSettings {
    pub base_url: String,
    pub path: String,
    pub base: String,
    pub compare: String,
    pub interval_secs: u64,
    pub request_timeout_ms: u64,
}

impl Default for RatesSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.frankfurter.app/".to_string(),
            path: "latest".to_string(),
            base: "EUR".to_string(),
            compare: "USD".to_string(),
            interval_secs: 60,
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: AppSettings,
    pub rates: RatesSettings,
    pub transfer: TransferConfig,
    /// Poll once and exit.
    #[serde(skip)]
    pub once: bool,
}

impl Settings {
    fn validate(self) -> Result<Self> {
        if self.rates.interval_secs == 0 {
            return Err(AppError::Settings(
                "rates.interval_secs must be at least 1".to_string(),
            ));
        }
        if self.rates.base.eq_ignore_ascii_case(&self.rates.compare) {
            return Err(AppError::Settings(format!(
                "base and compare currency are both {}",
                self.rates.base
            )));
        }
        Ok(self)
    }
}

#[derive(Debug, Parser)]
#[command(name = "rates", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the rates service URL (e.g. https://api.frankfurter.app/).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the base currency.
    #[arg(long)]
    base: Option<String>,
    /// Override the compared currency.
    #[arg(long)]
    compare: Option<String>,
    /// Override the polling interval, in seconds.
    #[arg(long)]
    interval_secs: Option<u64>,
    /// Poll once and exit.
    #[arg(long)]
    once: bool,
}

pub fn load() -> Result<Settings> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("RATES").separator("__"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.rates.base_url = base_url;
    }
    if let Some(base) = args.base {
        settings.rates.base = base;
    }
    if let Some(compare) = args.compare {
        settings.rates.compare = compare;
    }
    if let Some(interval_secs) = args.interval_secs {
        settings.rates.interval_secs = interval_secs;
    }
    settings.once = args.once;

    settings.validate()
}

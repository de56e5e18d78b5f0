use thiserror::Error;
use transfer::SetupError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("setup error: {0}")]
    Setup(#[from] SetupError),
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    #[error("invalid settings: {0}")]
    Settings(String),
}

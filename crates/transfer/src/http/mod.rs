//! Classification of completed HTTP responses.
//!
//! The core only sees responses through [`HttpResponse`]; concrete
//! transports plug in by implementing it.
use std::{future::Future, io};

use serde::de::DeserializeOwned;

use crate::{
    action::{catch, catch_async},
    error::BoxError,
    status::TransferStatus,
    transfer::Transfer,
};

#[cfg(feature = "reqwest")]
mod buffered;

#[cfg(feature = "reqwest")]
pub use buffered::BufferedResponse;

/// Status codes the classifier treats specially, plus range boundaries.
pub struct HttpCode;

impl HttpCode {
    pub const CONTINUE: u16 = 100;
    pub const SUCCESS: u16 = 200;
    pub const REDIRECT: u16 = 300;
    pub const CLIENT_ERROR: u16 = 400;
    pub const SERVER_ERROR: u16 = 500;
    pub const UNKNOWN: u16 = 600;

    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const NO_CONTENT: u16 = 204;
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const BAD_METHOD: u16 = 405;
    pub const CLIENT_TIMEOUT: u16 = 408;
    pub const CONFLICT: u16 = 409;
    pub const UNAVAILABLE: u16 = 503;
    pub const GATEWAY_TIMEOUT: u16 = 504;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRange {
    Informational,
    Success,
    Redirect,
    ClientError,
    ServerError,
    Unknown,
}

impl CodeRange {
    pub fn of(code: u16) -> Self {
        match code {
            HttpCode::CONTINUE..HttpCode::SUCCESS => Self::Informational,
            HttpCode::SUCCESS..HttpCode::REDIRECT => Self::Success,
            HttpCode::REDIRECT..HttpCode::CLIENT_ERROR => Self::Redirect,
            HttpCode::CLIENT_ERROR..HttpCode::SERVER_ERROR => Self::ClientError,
            HttpCode::SERVER_ERROR..HttpCode::UNKNOWN => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// A completed response as seen by the classifier.
pub trait HttpResponse {
    fn code(&self) -> u16;

    /// Reason phrase; may be blank.
    fn message(&self) -> &str;

    /// Raw success body, if any.
    fn body(&self) -> Option<&[u8]>;

    /// Error body as text. Reading it may fail.
    fn error_body(&self) -> Result<String, BoxError>;
}

/// In-memory [`HttpResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    code: u16,
    message: String,
    body: Option<Vec<u8>>,
    error_body: Option<String>,
    unreadable_error_body: bool,
}

impl RawResponse {
    pub fn new(code: u16) -> Self {
        Self {
            code,
            ..Self::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_error_body(mut self, error_body: impl Into<String>) -> Self {
        self.error_body = Some(error_body.into());
        self
    }

    /// Make [`HttpResponse::error_body`] fail.
    pub fn with_unreadable_error_body(mut self) -> Self {
        self.unreadable_error_body = true;
        self
    }
}

impl HttpResponse for RawResponse {
    fn code(&self) -> u16 {
        self.code
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    fn error_body(&self) -> Result<String, BoxError> {
        if self.unreadable_error_body {
            return Err(io::Error::other("error body is not readable").into());
        }
        Ok(self.error_body.clone().unwrap_or_default())
    }
}

impl<T: DeserializeOwned> Transfer<T> {
    /// Classify a completed response.
    pub fn from_http(response: &impl HttpResponse) -> Self {
        let code = response.code();
        match code {
            HttpCode::OK | HttpCode::CREATED => decode_body(response),
            HttpCode::NO_CONTENT => no_content(),
            HttpCode::BAD_REQUEST | HttpCode::FORBIDDEN | HttpCode::BAD_METHOD => {
                failed(response, TransferStatus::UserError)
            }
            HttpCode::UNAUTHORIZED => failed(response, TransferStatus::AuthorizationError),
            HttpCode::NOT_FOUND => failed(response, TransferStatus::NotFound),
            HttpCode::CONFLICT => failed(response, TransferStatus::ResourceConflict),
            HttpCode::CLIENT_TIMEOUT => failed(response, TransferStatus::NetworkError),
            HttpCode::UNAVAILABLE | HttpCode::GATEWAY_TIMEOUT => {
                failed(response, TransferStatus::GeneralError)
            }
            _ => match CodeRange::of(code) {
                CodeRange::Informational | CodeRange::Success | CodeRange::Redirect => {
                    decode_body(response)
                }
                CodeRange::ClientError => failed(response, TransferStatus::UserError),
                CodeRange::ServerError | CodeRange::Unknown => {
                    failed(response, TransferStatus::GeneralError)
                }
            },
        }
    }

    /// Run a request and classify its response; transport errors go
    /// through the exception classifier.
    pub fn from_response<R, E>(action: impl FnOnce() -> Result<R, E>) -> Self
    where
        R: HttpResponse,
        E: Into<BoxError>,
    {
        match catch(action) {
            Ok(Ok(response)) => Self::from_http(&response),
            Ok(Err(err)) => Transfer::from_error(err),
            Err(failure) => Transfer::Failure(failure),
        }
    }

    pub async fn from_async_response<R, E>(action: impl Future<Output = Result<R, E>>) -> Self
    where
        R: HttpResponse,
        E: Into<BoxError>,
    {
        match catch_async(action).await {
            Ok(Ok(response)) => Self::from_http(&response),
            Ok(Err(err)) => Transfer::from_error(err),
            Err(failure) => Transfer::Failure(failure),
        }
    }
}

fn decode_body<T: DeserializeOwned>(response: &impl HttpResponse) -> Transfer<T> {
    match response.body() {
        Some(bytes) => match serde_json::from_slice(bytes) {
            Ok(data) => Transfer::Success(data),
            Err(err) => Transfer::general_error_with("Invalid data", err),
        },
        None => Transfer::general_error("Invalid data"),
    }
}

/// Only payloads that can be built from JSON `null` survive a 204.
fn no_content<T: DeserializeOwned>() -> Transfer<T> {
    match serde_json::from_value(serde_json::Value::Null) {
        Ok(data) => Transfer::Success(data),
        Err(err) => Transfer::general_error_with("Cannot pack no-content transfer", err),
    }
}

fn failed<T>(response: &impl HttpResponse, status: TransferStatus) -> Transfer<T> {
    tracing::debug!(code = response.code(), %status, "http response classified as failure");

    let message = if response.message().trim().is_empty() {
        match response.error_body() {
            Ok(body) => body,
            Err(err) => {
                return Transfer::general_error_with(
                    format!("Cannot pack {} transfer", describe(status)),
                    err,
                );
            }
        }
    } else {
        response.message().to_string()
    };

    match status {
        TransferStatus::UserError => Transfer::user_error(message),
        TransferStatus::AuthorizationError => Transfer::authorization_error(message),
        TransferStatus::NotFound => Transfer::not_found(message),
        TransferStatus::ResourceConflict => Transfer::resource_conflict_error(message),
        TransferStatus::NetworkError => Transfer::network_error(message),
        _ => Transfer::general_error(message),
    }
}

fn describe(status: TransferStatus) -> &'static str {
    match status {
        TransferStatus::UserError => "user error",
        TransferStatus::AuthorizationError => "authorization error",
        TransferStatus::NotFound => "not-found",
        TransferStatus::ResourceConflict => "resource conflict error",
        TransferStatus::NetworkError => "network error",
        _ => "general error",
    }
}

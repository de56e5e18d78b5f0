//! Uniform results for fallible, asynchronous operations.
//!
//! A [`Transfer`] is either a success carrying data or a failure carrying a
//! [`TransferStatus`] and a [`TransferError`]. Panics and errors raised by
//! user code inside any combinator are classified into a failure instead of
//! escaping.
//!
//! ```no_run
//! use transfer::prelude::*;
//!
//! # async fn fetch_user() -> Transfer<String> { Transfer::success("ada".into()) }
//! # async fn fetch_score() -> Transfer<u32> { Transfer::success(7) }
//! # async fn run() {
//! (fetch_user(), fetch_score())
//!     .unfold(
//!         |(user, score)| println!("{user}: {score}"),
//!         |error| eprintln!("failed: {error}"),
//!     )
//!     .await;
//! # }
//! ```
pub use action::TransferFutureExt;
pub use classify::ExceptionClassifier;
pub use combine::Combine;
pub use error::{BoxError, Cause, FailureCause, GatewayError, SetupError, TransferError};
#[cfg(feature = "reqwest")]
pub use http::BufferedResponse;
pub use http::{CodeRange, HttpCode, HttpResponse, RawResponse};
pub use logger::{NoopLogger, TracingLogger, TransferLogger};
pub use par::ParCombine;
pub use status::TransferStatus;
pub use stream::{TransferStreamExt, poll_every};
pub use transfer::{Failure, Transfer};

pub mod config;
pub mod logger;

mod action;
mod classify;
mod combine;
mod error;
mod http;
mod ops;
mod par;
mod status;
mod stream;
mod transfer;

/// Everything needed to build and chain transfers.
pub mod prelude {
    pub use crate::{
        Combine, Failure, ParCombine, Transfer, TransferError, TransferFutureExt,
        TransferStatus, TransferStreamExt,
    };
}

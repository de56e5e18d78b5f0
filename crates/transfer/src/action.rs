//! Entry points that turn plain code into transfers, plus the future
//! extension used to bound and observe a single asynchronous transfer.
use std::{
    future::Future,
    panic::{self, AssertUnwindSafe},
    time::Duration,
};

use futures_util::FutureExt;
use tokio::sync::oneshot;

use crate::{
    classify::ExceptionClassifier,
    config,
    error::{BoxError, TransferError},
    status::TransferStatus,
    transfer::{Failure, Transfer},
};

/// Run `f`, turning a panic into a classified failure.
pub(crate) fn catch<R>(f: impl FnOnce() -> R) -> Result<R, Failure> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(Failure::from_panic)
}

/// Await `fut`, turning a panic into a classified failure.
pub(crate) async fn catch_async<F: Future>(fut: F) -> Result<F::Output, Failure> {
    AssertUnwindSafe(fut)
        .catch_unwind()
        .await
        .map_err(Failure::from_panic)
}

/// Await a future yielding a transfer; a panic becomes a failure.
pub(crate) async fn guarded<T>(fut: impl Future<Output = Transfer<T>>) -> Transfer<T> {
    catch_async(fut).await.unwrap_or_else(Transfer::Failure)
}

impl<T> Transfer<T> {
    /// Run a synchronous action; a panic becomes a `GENERAL_ERROR`.
    pub fn from_action(action: impl FnOnce() -> T) -> Self {
        catch(action).map_or_else(Transfer::Failure, Transfer::Success)
    }

    /// Like [`Transfer::from_action`] for actions that already produce a
    /// transfer.
    pub fn wrap_action(action: impl FnOnce() -> Transfer<T>) -> Self {
        catch(action).unwrap_or_else(Transfer::Failure)
    }

    /// Run a fallible action; its `Err` goes through the classifier.
    pub fn try_from_action<E>(action: impl FnOnce() -> Result<T, E>) -> Self
    where
        E: Into<BoxError>,
    {
        match catch(action) {
            Ok(result) => result.into(),
            Err(failure) => failure.into(),
        }
    }

    pub async fn from_async_action(action: impl Future<Output = T>) -> Self {
        catch_async(action)
            .await
            .map_or_else(Transfer::Failure, Transfer::Success)
    }

    pub async fn from_async_result<E>(action: impl Future<Output = Result<T, E>>) -> Self
    where
        E: Into<BoxError>,
    {
        match catch_async(action).await {
            Ok(result) => result.into(),
            Err(failure) => failure.into(),
        }
    }

    /// Bridge a callback-style API with the configured default budget.
    ///
    /// `action` receives the sender half of a one-shot channel and is
    /// expected to complete it from its callback.
    pub async fn from_callback(action: impl FnOnce(oneshot::Sender<T>)) -> Self {
        Self::from_callback_within(config::current().callback_timeout(), action).await
    }

    /// Bridge a callback-style API with an explicit budget.
    ///
    /// A dropped sender yields `CANCELED`; so does an expired budget, with a
    /// [`FailureCause::Timeout`](crate::FailureCause::Timeout) cause.
    pub async fn from_callback_within(
        timeout: Duration,
        action: impl FnOnce(oneshot::Sender<T>),
    ) -> Self {
        let (tx, rx) = oneshot::channel();
        if let Err(failure) = catch(|| action(tx)) {
            return failure.into();
        }
        async move {
            match rx.await {
                Ok(data) => Transfer::Success(data),
                Err(err) => Transfer::from_error(err),
            }
        }
        .timeout(timeout)
        .await
    }
}

/// Combinators for a single future that yields a [`Transfer`].
pub trait TransferFutureExt<T>: Future<Output = Transfer<T>> + Sized {
    /// Convert a panic while polling into a `GENERAL_ERROR`.
    fn catch_panics(self) -> impl Future<Output = Transfer<T>> {
        guarded(self)
    }

    /// Bound the wait; on expiry the result is `CANCELED` with a
    /// [`FailureCause::Timeout`](crate::FailureCause::Timeout) cause and the
    /// inner future is dropped.
    fn timeout(self, duration: Duration) -> impl Future<Output = Transfer<T>> {
        self.timeout_with(duration, ExceptionClassifier::global())
    }

    /// Like [`TransferFutureExt::timeout`], reporting expiry to
    /// `classifier`'s logger.
    fn timeout_with(
        self,
        duration: Duration,
        classifier: ExceptionClassifier,
    ) -> impl Future<Output = Transfer<T>> {
        async move {
            match tokio::time::timeout(duration, guarded(self)).await {
                Ok(transfer) => transfer,
                Err(_) => Transfer::Failure(classifier.timeout_failure(duration)),
            }
        }
    }

    /// Await, then call exactly one of the callbacks.
    fn unfold(
        self,
        success: impl FnOnce(T),
        failure: impl FnOnce(TransferError),
    ) -> impl Future<Output = ()> {
        async move { guarded(self).await.unfold(success, failure) }
    }

    fn unfold_with_status(
        self,
        success: impl FnOnce(T),
        failure: impl FnOnce(TransferStatus, TransferError),
    ) -> impl Future<Output = ()> {
        async move { guarded(self).await.unfold_with_status(success, failure) }
    }
}

impl<T, F> TransferFutureExt<T> for F where F: Future<Output = Transfer<T>> {}

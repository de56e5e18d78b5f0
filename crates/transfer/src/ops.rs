//! Sequential combinators over a single [`Transfer`].
//!
//! A failure passed through any of these keeps its status and error; user
//! closures that panic or return `Err` are routed through the classifier.
use std::future::Future;

use crate::{
    action::{catch, catch_async},
    error::{BoxError, TransferError},
    status::TransferStatus,
    transfer::{Failure, Transfer},
};

impl<T> Transfer<T> {
    pub fn transform<R>(self, f: impl FnOnce(T) -> R) -> Transfer<R> {
        match self {
            Transfer::Success(data) => Transfer::from_action(|| f(data)),
            Transfer::Failure(failure) => Transfer::Failure(failure),
        }
    }

    pub fn try_transform<R, E>(self, f: impl FnOnce(T) -> Result<R, E>) -> Transfer<R>
    where
        E: Into<BoxError>,
    {
        match self {
            Transfer::Success(data) => Transfer::try_from_action(|| f(data)),
            Transfer::Failure(failure) => Transfer::Failure(failure),
        }
    }

    pub async fn transform_async<R, F, Fut>(self, f: F) -> Transfer<R>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = R>,
    {
        match self {
            Transfer::Success(data) => match catch(|| f(data)) {
                Ok(fut) => Transfer::from_async_action(fut).await,
                Err(failure) => Transfer::Failure(failure),
            },
            Transfer::Failure(failure) => Transfer::Failure(failure),
        }
    }

    pub fn flat_transform<R>(self, f: impl FnOnce(T) -> Transfer<R>) -> Transfer<R> {
        match self {
            Transfer::Success(data) => Transfer::wrap_action(|| f(data)),
            Transfer::Failure(failure) => Transfer::Failure(failure),
        }
    }

    pub async fn flat_transform_async<R, F, Fut>(self, f: F) -> Transfer<R>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Transfer<R>>,
    {
        match self {
            Transfer::Success(data) => match catch(|| f(data)) {
                Ok(fut) => catch_async(fut).await.unwrap_or_else(Transfer::Failure),
                Err(failure) => Transfer::Failure(failure),
            },
            Transfer::Failure(failure) => Transfer::Failure(failure),
        }
    }

    /// Reduce to a single value, one function per variant.
    pub fn fold<R>(
        self,
        on_failure: impl FnOnce(TransferStatus, TransferError) -> R,
        on_success: impl FnOnce(T) -> R,
    ) -> R {
        match self {
            Transfer::Success(data) => on_success(data),
            Transfer::Failure(failure) => {
                let (status, error) = failure.into_parts();
                on_failure(status, error)
            }
        }
    }

    /// Unwrap the value or compute one from the error.
    ///
    /// If `fallback` panics it is called once more with the classified panic.
    ///
    /// # Panics
    ///
    /// A panic raised by that second call is not caught: there is no value
    /// of `T` left to return.
    pub fn get_or_else(self, fallback: impl Fn(&TransferError) -> T) -> T {
        match self {
            Transfer::Success(data) => data,
            Transfer::Failure(failure) => match catch(|| fallback(failure.error())) {
                Ok(data) => data,
                Err(panicked) => fallback(panicked.error()),
            },
        }
    }

    /// Side effect on the value; a panicking hook turns the result into a
    /// failure.
    pub fn on_success(self, f: impl FnOnce(&T)) -> Self {
        match self {
            Transfer::Success(data) => match catch(|| f(&data)) {
                Ok(()) => Transfer::Success(data),
                Err(failure) => Transfer::Failure(failure),
            },
            failure => failure,
        }
    }

    pub async fn on_success_async(self, f: impl AsyncFnOnce(&T)) -> Self {
        match self {
            Transfer::Success(data) => match catch_async(f(&data)).await {
                Ok(()) => Transfer::Success(data),
                Err(failure) => Transfer::Failure(failure),
            },
            failure => failure,
        }
    }

    /// Continue with an asynchronous step that produces the next transfer.
    pub async fn on_success_resume<R, F, Fut>(self, f: F) -> Transfer<R>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Transfer<R>>,
    {
        self.flat_transform_async(f).await
    }

    /// Run a fallible side step and keep the original value, unless the step
    /// fails.
    pub fn on_success_continue<U>(self, f: impl FnOnce(&T) -> Transfer<U>) -> Self {
        match self {
            Transfer::Success(data) => match Transfer::wrap_action(|| f(&data)) {
                Transfer::Success(_) => Transfer::Success(data),
                Transfer::Failure(failure) => Transfer::Failure(failure),
            },
            failure => failure,
        }
    }

    /// Side effect on a failure; the failure itself is passed on unchanged.
    pub fn on_error(self, f: impl FnOnce(&Failure)) -> Self {
        if let Transfer::Failure(failure) = &self {
            // A panicking observer must not replace the original failure.
            let _ = catch(|| f(failure));
        }
        self
    }

    pub async fn on_error_async(self, f: impl AsyncFnOnce(&Failure)) -> Self {
        if let Transfer::Failure(failure) = &self {
            let _ = catch_async(f(failure)).await;
        }
        self
    }

    /// Recover from a failure with another transfer.
    pub fn on_error_resume(self, f: impl FnOnce(Failure) -> Transfer<T>) -> Self {
        match self {
            Transfer::Failure(failure) => Transfer::wrap_action(|| f(failure)),
            success => success,
        }
    }

    pub async fn on_error_resume_async<F, Fut>(self, f: F) -> Self
    where
        F: FnOnce(Failure) -> Fut,
        Fut: Future<Output = Transfer<T>>,
    {
        match self {
            Transfer::Failure(failure) => match catch(|| f(failure)) {
                Ok(fut) => catch_async(fut).await.unwrap_or_else(Transfer::Failure),
                Err(panicked) => Transfer::Failure(panicked),
            },
            success => success,
        }
    }

    /// Recover from a failure with a plain value.
    pub fn on_error_return(self, f: impl FnOnce(Failure) -> T) -> Self {
        match self {
            Transfer::Failure(failure) => Transfer::from_action(|| f(failure)),
            success => success,
        }
    }

    pub async fn on_error_return_async<F, Fut>(self, f: F) -> Self
    where
        F: FnOnce(Failure) -> Fut,
        Fut: Future<Output = T>,
    {
        match self {
            Transfer::Failure(failure) => match catch(|| f(failure)) {
                Ok(fut) => Transfer::from_async_action(fut).await,
                Err(panicked) => Transfer::Failure(panicked),
            },
            success => success,
        }
    }

    /// Replace a failure with the classification of another error.
    pub fn on_error_throw<E>(self, f: impl FnOnce(Failure) -> E) -> Self
    where
        E: Into<BoxError>,
    {
        match self {
            Transfer::Failure(failure) => match catch(|| f(failure)) {
                Ok(err) => Transfer::from_error(err),
                Err(panicked) => Transfer::Failure(panicked),
            },
            success => success,
        }
    }

    /// Discard both the value and any failure.
    pub fn on_error_skip_result(self) -> Transfer<()> {
        Transfer::empty()
    }

    /// Discard the value, keep a failure.
    pub fn skip_result(self) -> Transfer<()> {
        self.transform(|_| ())
    }

    /// Call exactly one of the callbacks.
    ///
    /// A panic inside `success` is classified and handed to `failure`, which
    /// is then the only failure callback made.
    pub fn unfold(self, success: impl FnOnce(T), failure: impl FnOnce(TransferError)) {
        self.unfold_with_status(success, |_, error| failure(error));
    }

    pub fn unfold_with_status(
        self,
        success: impl FnOnce(T),
        failure: impl FnOnce(TransferStatus, TransferError),
    ) {
        let outcome = match self {
            Transfer::Success(data) => catch(|| success(data)),
            Transfer::Failure(failed) => Err(failed),
        };
        if let Err(failed) = outcome {
            let (status, error) = failed.into_parts();
            failure(status, error);
        }
    }
}

impl<T> Transfer<Transfer<T>> {
    pub fn flatten(self) -> Transfer<T> {
        self.flat_transform(|inner| inner)
    }
}

//! The combinators lifted onto streams of transfers.
//!
//! Each element goes through the same contract as a single transfer.
//! Dropping a consumer, or resolving the shutdown signal given to
//! [`TransferStreamExt::unfold_until`], ends the stream without calling any
//! failure callback.
use std::{future::Future, time::Duration};

use async_stream::stream;
use futures_util::{Stream, StreamExt, future};
use tokio::time::MissedTickBehavior;

use crate::{
    action::{catch, catch_async, guarded},
    combine::Combine,
    error::TransferError,
    status::TransferStatus,
    transfer::Transfer,
};

pub trait TransferStreamExt<T>: Stream<Item = Transfer<T>> + Sized {
    fn transform<R>(self, mut f: impl FnMut(T) -> R) -> impl Stream<Item = Transfer<R>> {
        self.map(move |transfer| transfer.transform(&mut f))
    }

    fn flat_transform<R>(
        self,
        mut f: impl FnMut(T) -> Transfer<R>,
    ) -> impl Stream<Item = Transfer<R>> {
        self.map(move |transfer| transfer.flat_transform(&mut f))
    }

    fn flat_transform_async<R, F, Fut>(self, mut f: F) -> impl Stream<Item = Transfer<R>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Transfer<R>>,
    {
        stream! {
            let source = self;
            tokio::pin!(source);
            while let Some(transfer) = source.next().await {
                yield transfer.flat_transform_async(&mut f).await;
            }
        }
    }

    /// Drop failed elements.
    fn successes(self) -> impl Stream<Item = Transfer<T>> {
        self.filter(|transfer| future::ready(transfer.is_success()))
    }

    /// Emit once both streams have produced an element, then again on every
    /// new element of either side, combining the latest pair.
    fn combine_latest<U, R, S, F>(self, other: S, mut f: F) -> impl Stream<Item = Transfer<R>>
    where
        S: Stream<Item = Transfer<U>>,
        T: Clone,
        U: Clone,
        F: FnMut(T, U) -> R,
    {
        stream! {
            let left = self.fuse();
            let right = other.fuse();
            tokio::pin!(left, right);

            let mut latest_left: Option<Transfer<T>> = None;
            let mut latest_right: Option<Transfer<U>> = None;
            loop {
                tokio::select! {
                    Some(transfer) = left.next() => latest_left = Some(transfer),
                    Some(transfer) = right.next() => latest_right = Some(transfer),
                    else => break,
                }
                if let (Some(a), Some(b)) = (&latest_left, &latest_right) {
                    yield (a.clone(), b.clone()).combine_with(|(a, b)| f(a, b));
                }
            }
        }
    }

    /// Drain the stream, calling one callback per element.
    ///
    /// A panic while polling the stream is reported once to `failure` and
    /// ends the drain.
    fn unfold(
        self,
        success: impl FnMut(T),
        mut failure: impl FnMut(TransferError),
    ) -> impl Future<Output = ()> {
        self.unfold_with_status(success, move |_, error| failure(error))
    }

    fn unfold_with_status(
        self,
        mut success: impl FnMut(T),
        mut failure: impl FnMut(TransferStatus, TransferError),
    ) -> impl Future<Output = ()> {
        async move {
            let source = self;
            tokio::pin!(source);
            loop {
                match catch_async(source.next()).await {
                    Ok(Some(transfer)) => transfer.unfold_with_status(&mut success, &mut failure),
                    Ok(None) => break,
                    Err(panicked) => {
                        let (status, error) = panicked.into_parts();
                        failure(status, error);
                        break;
                    }
                }
            }
        }
    }

    /// Like [`TransferStreamExt::unfold`], stopping silently once `shutdown`
    /// resolves.
    fn unfold_until(
        self,
        shutdown: impl Future<Output = ()>,
        success: impl FnMut(T),
        failure: impl FnMut(TransferError),
    ) -> impl Future<Output = ()> {
        async move {
            tokio::select! {
                () = shutdown => tracing::debug!("transfer stream stopped by shutdown"),
                () = self.unfold(success, failure) => {}
            }
        }
    }
}

impl<T, S> TransferStreamExt<T> for S where S: Stream<Item = Transfer<T>> {}

/// Call `factory` every `period`, the first time immediately.
///
/// A late poll delays the following ones instead of bursting to catch up.
pub fn poll_every<T, F, Fut>(period: Duration, mut factory: F) -> impl Stream<Item = Transfer<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Transfer<T>>,
{
    stream! {
        let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let transfer = match catch(&mut factory) {
                Ok(fut) => guarded(fut).await,
                Err(failure) => Transfer::Failure(failure),
            };
            yield transfer;
        }
    }
}

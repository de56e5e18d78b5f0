//! Concurrent fan-out over 2 to 6 futures yielding transfers.
//!
//! Every branch is polled from the start and driven to completion; the
//! reported outcome only depends on argument positions, never on which
//! branch finished first.
use std::future::Future;

use crate::{
    action::guarded,
    combine::Combine,
    error::TransferError,
    status::TransferStatus,
    transfer::Transfer,
};

pub trait ParCombine: Sized {
    type Values;

    /// Run all branches concurrently and combine their results.
    fn par_combine(self) -> impl Future<Output = Transfer<Self::Values>>;

    /// Run all branches, then call exactly one of the callbacks.
    fn unfold(
        self,
        success: impl FnOnce(Self::Values),
        failure: impl FnOnce(TransferError),
    ) -> impl Future<Output = ()> {
        async move { self.par_combine().await.unfold(success, failure) }
    }

    fn unfold_with_status(
        self,
        success: impl FnOnce(Self::Values),
        failure: impl FnOnce(TransferStatus, TransferError),
    ) -> impl Future<Output = ()> {
        async move {
            self.par_combine()
                .await
                .unfold_with_status(success, failure)
        }
    }
}

macro_rules! impl_par_combine {
    ($($F:ident $T:ident $f:ident),+) => {
        impl<$($F, $T),+> ParCombine for ($($F,)+)
        where
            $($F: Future<Output = Transfer<$T>>),+
        {
            type Values = ($($T,)+);

            fn par_combine(self) -> impl Future<Output = Transfer<Self::Values>> {
                let ($($f,)+) = self;
                async move { tokio::join!($(guarded($f)),+).combine() }
            }
        }
    };
}

impl_par_combine!(FA A fa, FB B fb);
impl_par_combine!(FA A fa, FB B fb, FC C fc);
impl_par_combine!(FA A fa, FB B fb, FC C fc, FD D fd);
impl_par_combine!(FA A fa, FB B fb, FC C fc, FD D fd, FE E fe);
impl_par_combine!(FA A fa, FB B fb, FC C fc, FD D fd, FE E fe, FF F ff);

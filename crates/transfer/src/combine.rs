//! Gathering of already-completed transfers, arity 2 to 6.
use std::future::Future;

use crate::transfer::Transfer;

/// Merge a tuple of transfers into a transfer of a tuple.
///
/// When more than one element failed, the leftmost failure is reported.
pub trait Combine: Sized {
    type Values;

    fn combine(self) -> Transfer<Self::Values>;

    /// Combine, then aggregate the values.
    fn combine_with<R>(self, f: impl FnOnce(Self::Values) -> R) -> Transfer<R> {
        self.combine().transform(f)
    }

    /// Combine, then run an aggregation step that may itself fail.
    fn flat_combine<R>(self, f: impl FnOnce(Self::Values) -> Transfer<R>) -> Transfer<R> {
        self.combine().flat_transform(f)
    }

    fn flat_combine_async<R, F, Fut>(self, f: F) -> impl Future<Output = Transfer<R>>
    where
        F: FnOnce(Self::Values) -> Fut,
        Fut: Future<Output = Transfer<R>>,
    {
        self.combine().flat_transform_async(f)
    }
}

macro_rules! impl_combine {
    ($($T:ident $t:ident),+) => {
        impl<$($T),+> Combine for ($(Transfer<$T>,)+) {
            type Values = ($($T,)+);

            fn combine(self) -> Transfer<Self::Values> {
                let ($($t,)+) = self;
                // Positional order decides which failure is reported.
                $(
                    let $t = match $t {
                        Transfer::Success(data) => data,
                        Transfer::Failure(failure) => return Transfer::Failure(failure),
                    };
                )+
                Transfer::Success(($($t,)+))
            }
        }
    };
}

impl_combine!(A a, B b);
impl_combine!(A a, B b, C c);
impl_combine!(A a, B b, C c, D d);
impl_combine!(A a, B b, C c, D d, E e);
impl_combine!(A a, B b, C c, D d, E e, F f);

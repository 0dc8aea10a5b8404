//! Combining independent fallible producers.
//!
//! Two families, each working over tuples of 1 to 10 producers:
//!
//! - [`zip`] / [`zip_async`]: fail fast. The first failure in declaration
//!   order is returned and nothing after it is needed.
//! - [`zip_or_accumulate`] / [`zip_or_accumulate_async`]: run everything and
//!   report every failure, in declaration order.
//!
//! Producers may return either `Outcome` or `Result`, as long as they share
//! the error type. The transform receives the success values as one tuple.
//!
//! # Examples
//!
//! ```
//! use confluence::{zip, zip_or_accumulate, Outcome};
//!
//! fn name() -> Outcome<String, &'static str> {
//!     Outcome::success("Ada".to_string())
//! }
//! fn age() -> Outcome<u8, &'static str> {
//!     Outcome::failure("age missing")
//! }
//! fn email() -> Outcome<String, &'static str> {
//!     Outcome::failure("email invalid")
//! }
//!
//! let fast = zip((name, age, email), |(n, a, e)| format!("{} {} {}", n, a, e));
//! assert_eq!(fast, Outcome::Failure("age missing"));
//!
//! let all = zip_or_accumulate((name, age, email), |(n, a, e)| format!("{} {} {}", n, a, e));
//! assert_eq!(all, Outcome::Failure(vec!["age missing", "email invalid"]));
//! ```

use std::future::Future;
use std::pin::pin;
use std::task::Poll;

use futures::future::{maybe_done, poll_fn};

use crate::binding::binding;
use crate::outcome::IntoOutcome;
use crate::Outcome;

/// A tuple of producers (`FnOnce() -> Outcome<T, E>` or `-> Result<T, E>`).
///
/// Implemented for tuples of 1 to 10 producers sharing the error type `E`.
pub trait ZipProducers<E> {
    /// Tuple of the producers' success values.
    type Values;

    /// Invoke producers left to right, stopping at the first failure.
    fn zip_all(self) -> Outcome<Self::Values, E>;

    /// Invoke every producer and collect all failures in order.
    fn zip_or_accumulate_all(self) -> Outcome<Self::Values, Vec<E>>;
}

/// A tuple of futures resolving to `Outcome<T, E>` or `Result<T, E>`.
///
/// Implemented for tuples of 1 to 10 futures sharing the error type `E`.
pub trait ZipFutures<E> {
    /// Tuple of the futures' success values.
    type Values;

    /// Poll all futures concurrently; resolve to the first failure in
    /// declaration order as soon as it is known, dropping the rest.
    fn zip_all(self) -> impl Future<Output = Outcome<Self::Values, E>>;

    /// Poll all futures concurrently to completion and collect all failures in order.
    fn zip_or_accumulate_all(self) -> impl Future<Output = Outcome<Self::Values, Vec<E>>>;
}

// Turns the per-slot outcomes bound to `$v` into one accumulated outcome.
macro_rules! accumulate {
    ($E:ty; $($v:ident),+) => {{
        let mut errors: Vec<$E> = Vec::new();
        $(
            let $v = match $v {
                Outcome::Success(value) => Some(value),
                Outcome::Failure(error) => {
                    errors.push(error);
                    None
                }
            };
        )+
        match ($($v,)+) {
            ($(Some($v),)+) => Outcome::Success(($($v,)+)),
            _ => Outcome::Failure(errors),
        }
    }};
}

macro_rules! impl_zip {
    ($($P:ident $R:ident $v:ident),+) => {
        impl<E, $($P, $R),+> ZipProducers<E> for ($($P,)+)
        where
            $(
                $P: FnOnce() -> $R,
                $R: IntoOutcome<E>,
            )+
        {
            type Values = ($(<$R as IntoOutcome<E>>::Value,)+);

            #[allow(non_snake_case)]
            fn zip_all(self) -> Outcome<Self::Values, E> {
                let ($($P,)+) = self;
                binding(|scope| Ok(($(scope.bind($P())?,)+)))
            }

            #[allow(non_snake_case)]
            fn zip_or_accumulate_all(self) -> Outcome<Self::Values, Vec<E>> {
                let ($($P,)+) = self;
                $(let $v = $P().into_outcome();)+
                accumulate!(E; $($v),+)
            }
        }

        impl<E, $($P),+> ZipFutures<E> for ($($P,)+)
        where
            $(
                $P: Future,
                $P::Output: IntoOutcome<E>,
            )+
        {
            type Values = ($(<$P::Output as IntoOutcome<E>>::Value,)+);

            #[allow(non_snake_case)]
            async fn zip_all(self) -> Outcome<Self::Values, E> {
                let ($($P,)+) = self;
                $(
                    let mut $P = pin!(maybe_done(async move { $P.await.into_outcome() }));
                )+

                poll_fn(|cx| {
                    $(
                        let _ = $P.as_mut().poll(cx);
                    )+

                    // A failure is final once every earlier slot has succeeded.
                    $(
                        let failed = match $P.as_mut().output_mut() {
                            None => return Poll::Pending,
                            Some(outcome) => outcome.is_failure(),
                        };
                        if failed {
                            if let Some(Outcome::Failure(error)) = $P.as_mut().take_output() {
                                return Poll::Ready(Outcome::Failure(error));
                            }
                        }
                    )+

                    $(
                        let $v = $P.as_mut().take_output();
                    )+
                    match ($($v,)+) {
                        ($(Some(Outcome::Success($v)),)+) => Poll::Ready(Outcome::Success(($($v,)+))),
                        _ => unreachable!("every slot was checked as a success"),
                    }
                })
                .await
            }

            #[allow(non_snake_case)]
            async fn zip_or_accumulate_all(self) -> Outcome<Self::Values, Vec<E>> {
                let ($($P,)+) = self;
                let ($($v,)+) = futures::join!($(async move { $P.await.into_outcome() }),+);
                accumulate!(E; $($v),+)
            }
        }
    };
}

impl_zip!(P1 R1 v1);
impl_zip!(P1 R1 v1, P2 R2 v2);
impl_zip!(P1 R1 v1, P2 R2 v2, P3 R3 v3);
impl_zip!(P1 R1 v1, P2 R2 v2, P3 R3 v3, P4 R4 v4);
impl_zip!(P1 R1 v1, P2 R2 v2, P3 R3 v3, P4 R4 v4, P5 R5 v5);
impl_zip!(P1 R1 v1, P2 R2 v2, P3 R3 v3, P4 R4 v4, P5 R5 v5, P6 R6 v6);
impl_zip!(P1 R1 v1, P2 R2 v2, P3 R3 v3, P4 R4 v4, P5 R5 v5, P6 R6 v6, P7 R7 v7);
impl_zip!(P1 R1 v1, P2 R2 v2, P3 R3 v3, P4 R4 v4, P5 R5 v5, P6 R6 v6, P7 R7 v7, P8 R8 v8);
impl_zip!(P1 R1 v1, P2 R2 v2, P3 R3 v3, P4 R4 v4, P5 R5 v5, P6 R6 v6, P7 R7 v7, P8 R8 v8, P9 R9 v9);
impl_zip!(P1 R1 v1, P2 R2 v2, P3 R3 v3, P4 R4 v4, P5 R5 v5, P6 R6 v6, P7 R7 v7, P8 R8 v8, P9 R9 v9, P10 R10 v10);

/// Invoke producers left to right and combine their values, failing fast.
///
/// Returns the first failure in declaration order; producers after it are
/// never invoked.
///
/// # Example
///
/// ```rust
/// use confluence::{zip, Outcome};
///
/// let sum = zip(
///     (|| Outcome::<_, String>::success(1), || Ok(2), || Outcome::success(3)),
///     |(a, b, c)| a + b + c,
/// );
/// assert_eq!(sum, Outcome::Success(6));
/// ```
pub fn zip<E, P, U, F>(producers: P, transform: F) -> Outcome<U, E>
where
    P: ZipProducers<E>,
    F: FnOnce(P::Values) -> U,
{
    producers.zip_all().map(transform)
}

/// Invoke every producer and combine their values, or collect every failure.
///
/// Failures are returned in declaration order; successful values are
/// discarded when anything failed.
pub fn zip_or_accumulate<E, P, U, F>(producers: P, transform: F) -> Outcome<U, Vec<E>>
where
    P: ZipProducers<E>,
    F: FnOnce(P::Values) -> U,
{
    producers.zip_or_accumulate_all().map(transform)
}

/// Run futures concurrently and combine their values, failing fast.
///
/// Resolves to the first failure in declaration order. A failure at one slot
/// is final as soon as every earlier slot has succeeded; at that point the
/// remaining futures are dropped.
///
/// # Example
///
/// ```rust
/// use confluence::{zip_async, Outcome};
///
/// async fn load(n: u32) -> Outcome<u32, String> {
///     if n < 10 {
///         Outcome::success(n)
///     } else {
///         Outcome::failure(format!("{} out of range", n))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let ok = zip_async((load(1), load(2)), |(a, b)| a + b).await;
/// assert_eq!(ok, Outcome::Success(3));
///
/// let bad = zip_async((load(1), load(20), load(30)), |(a, b, c)| a + b + c).await;
/// assert_eq!(bad, Outcome::Failure("20 out of range".to_string()));
/// # });
/// ```
pub async fn zip_async<E, P, U, F>(futures: P, transform: F) -> Outcome<U, E>
where
    P: ZipFutures<E>,
    F: FnOnce(P::Values) -> U,
{
    futures.zip_all().await.map(transform)
}

/// Run futures concurrently to completion and combine their values, or
/// collect every failure in declaration order.
pub async fn zip_or_accumulate_async<E, P, U, F>(futures: P, transform: F) -> Outcome<U, Vec<E>>
where
    P: ZipFutures<E>,
    F: FnOnce(P::Values) -> U,
{
    futures.zip_or_accumulate_all().await.map(transform)
}

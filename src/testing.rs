//! Testing utilities for code built on `Outcome`.
//!
//! Assertion macros that print the unexpected side on failure, and (with the
//! `proptest` feature) an `Arbitrary` implementation for property tests.
//!
//! # Examples
//!
//! ```rust
//! use confluence::{assert_failure, assert_failure_eq, assert_success, Outcome};
//!
//! let success = Outcome::<_, String>::success(42);
//! let value = assert_success!(success);
//! assert_eq!(value, 42);
//!
//! let failure = Outcome::<i32, _>::failure("boom");
//! assert_failure!(failure);
//! assert_failure_eq!(failure, "boom");
//! ```

#[cfg(feature = "proptest")]
use crate::Outcome;

/// Assert that an outcome succeeds, evaluating to the success value.
///
/// Panics with the failure value if the outcome is a `Failure`.
///
/// # Example
///
/// ```rust
/// use confluence::{assert_success, Outcome};
///
/// let total = assert_success!(Outcome::<_, String>::success(7));
/// assert_eq!(total, 7);
/// ```
#[macro_export]
macro_rules! assert_success {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Success(value) => value,
            $crate::Outcome::Failure(e) => {
                panic!("Expected Success, got Failure: {:?}", e);
            }
        }
    };
}

/// Assert that an outcome fails, evaluating to the failure value.
///
/// Panics with the success value if the outcome is a `Success`.
///
/// # Example
///
/// ```rust
/// use confluence::{assert_failure, Outcome};
///
/// let error = assert_failure!(Outcome::<i32, _>::failure("missing"));
/// assert_eq!(error, "missing");
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Failure(e) => e,
            $crate::Outcome::Success(v) => {
                panic!("Expected Failure, got Success: {:?}", v);
            }
        }
    };
}

/// Assert that an outcome fails with a specific error.
///
/// # Example
///
/// ```rust
/// use confluence::{assert_failure_eq, zip_or_accumulate, Outcome};
///
/// let result = zip_or_accumulate(
///     (|| Outcome::<i32, _>::failure("a"), || Outcome::<i32, _>::failure("b")),
///     |(x, y)| x + y,
/// );
/// assert_failure_eq!(result, vec!["a", "b"]);
/// ```
#[macro_export]
macro_rules! assert_failure_eq {
    ($outcome:expr, $expected:expr) => {
        match $outcome {
            $crate::Outcome::Failure(e) => {
                assert_eq!(e, $expected);
            }
            $crate::Outcome::Success(v) => {
                panic!("Expected Failure {:?}, got Success: {:?}", $expected, v);
            }
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl<T, E> Arbitrary for Outcome<T, E>
where
    T: Arbitrary,
    E: Arbitrary,
{
    type Parameters = (T::Parameters, E::Parameters);
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        let (t_params, e_params) = args;
        prop_oneof![
            any_with::<T>(t_params).prop_map(Outcome::success),
            any_with::<E>(e_params).prop_map(Outcome::failure),
        ]
        .boxed()
    }
}

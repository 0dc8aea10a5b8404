//! Sequential binding scopes.
//!
//! [`binding`] runs a block with a [`BindingScope`] handle. Inside the block,
//! [`BindingScope::bind`] unwraps an `Outcome` (or `Result`): a success hands
//! back the value, a failure is recorded on the scope and an [`Unwind`] signal
//! is returned, which the block propagates with `?`. The scope then resolves to
//! `Failure(recorded error)`.
//!
//! ```
//! use confluence::{binding, Outcome};
//!
//! fn provide_x() -> Outcome<i32, String> {
//!     Outcome::success(1)
//! }
//!
//! fn provide_y() -> Outcome<i32, String> {
//!     Outcome::success(2)
//! }
//!
//! let sum = binding(|scope| {
//!     let x = scope.bind(provide_x())?;
//!     let y = scope.bind(provide_y())?;
//!     Ok(x + y)
//! });
//!
//! assert_eq!(sum, Outcome::Success(3));
//! ```
//!
//! # Scope branding
//!
//! Every scope carries its own invariant lifetime. The signal returned by one
//! scope's `bind` has a type that no other scope's block can return, so a
//! nested scope cannot unwind its parent:
//!
//! ```compile_fail
//! use confluence::{binding, Outcome};
//!
//! let _ = binding(|outer| {
//!     let inner = binding(|_inner| {
//!         // `Unwind<'outer>` is not `Unwind<'inner>`.
//!         outer.bind(Outcome::<i32, &str>::failure("e"))
//!     });
//!     Ok(inner)
//! });
//! ```

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;

use crate::outcome::IntoOutcome;
use crate::Outcome;

type Brand<'scope> = PhantomData<fn(&'scope ()) -> &'scope ()>;

/// Signal returned by a failed [`BindingScope::bind`].
///
/// It carries no data and cannot be built outside this crate. Return it from
/// the block (usually with `?`) to end the scope.
#[must_use = "an `Unwind` must be returned from the binding block to end the scope"]
pub struct Unwind<'scope> {
    _brand: Brand<'scope>,
}

impl fmt::Debug for Unwind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unwind")
    }
}

/// Handle passed to a [`binding`] block.
///
/// Holds the scope's recorded failure. Only the first failed `bind` is kept.
pub struct BindingScope<'scope, E> {
    failure: RefCell<Option<E>>,
    _brand: Brand<'scope>,
}

impl<E> fmt::Debug for BindingScope<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("failed", &self.failure.borrow().is_some())
            .finish()
    }
}

impl<'scope, E> BindingScope<'scope, E> {
    fn new() -> Self {
        BindingScope {
            failure: RefCell::new(None),
            _brand: PhantomData,
        }
    }

    /// Unwrap an `Outcome` or `Result`.
    ///
    /// Returns the success value, or records the error and returns [`Unwind`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::{binding, Outcome};
    ///
    /// let result = binding(|scope| {
    ///     let n: i32 = scope.bind("12".parse::<i32>().map_err(|e| e.to_string()))?;
    ///     let checked = scope.bind(if n > 10 {
    ///         Outcome::success(n)
    ///     } else {
    ///         Outcome::failure("too small".to_string())
    ///     })?;
    ///     Ok(checked * 2)
    /// });
    ///
    /// assert_eq!(result, Outcome::Success(24));
    /// ```
    pub fn bind<B>(&self, value: B) -> Result<B::Value, Unwind<'scope>>
    where
        B: IntoOutcome<E>,
    {
        match value.into_outcome() {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => {
                self.record(error);
                Err(Unwind {
                    _brand: PhantomData,
                })
            }
        }
    }

    /// Fail the scope with `error` unless `condition` holds.
    pub fn ensure(&self, condition: bool, error: impl FnOnce() -> E) -> Result<(), Unwind<'scope>> {
        if condition {
            Ok(())
        } else {
            self.bind(Outcome::<(), E>::Failure(error()))
        }
    }

    /// Returns `true` once any `bind` on this scope has failed.
    ///
    /// Useful when a block deliberately keeps going after a failed `bind`; the
    /// scope still resolves to the first failure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::{binding, Outcome};
    ///
    /// let result = binding(|scope| {
    ///     assert!(!scope.has_failed());
    ///     let _ = scope.bind(Outcome::<i32, _>::failure("ignored"));
    ///     assert!(scope.has_failed());
    ///     Ok(0)
    /// });
    ///
    /// assert_eq!(result, Outcome::Failure("ignored"));
    /// ```
    pub fn has_failed(&self) -> bool {
        self.failure.borrow().is_some()
    }

    fn record(&self, error: E) {
        let mut slot = self.failure.borrow_mut();
        if slot.is_none() {
            #[cfg(feature = "tracing")]
            tracing::trace!("binding scope recorded failure");
            *slot = Some(error);
        }
    }
}

/// Run `block` in a new sequential binding scope.
///
/// Resolves to `Success(value)` when the block returns `Ok(value)` and no
/// `bind` failed, and to `Failure(error)` with the first recorded error
/// otherwise. A block that swallows an [`Unwind`] and returns `Ok` still
/// resolves to the recorded failure.
///
/// Panics inside the block are not caught.
///
/// # Example
///
/// ```rust
/// use confluence::{binding, Outcome};
///
/// let result: Outcome<i32, &str> = binding(|scope| {
///     let a = scope.bind(Outcome::success(1))?;
///     let b = scope.bind(Outcome::<i32, _>::failure("no b"))?;
///     unreachable!("never reached: {}", a + b)
/// });
///
/// assert_eq!(result, Outcome::Failure("no b"));
/// ```
pub fn binding<V, E, F>(block: F) -> Outcome<V, E>
where
    F: for<'scope> FnOnce(&BindingScope<'scope, E>) -> Result<V, Unwind<'scope>>,
{
    let scope = BindingScope::new();
    let returned = block(&scope);
    match (returned, scope.failure.into_inner()) {
        (_, Some(error)) => Outcome::Failure(error),
        (Ok(value), None) => Outcome::Success(value),
        // `Unwind` is only produced by `bind` after recording on this same scope.
        (Err(_), None) => unreachable!("binding scope unwound without a recorded failure"),
    }
}

//! The `Outcome` type: a value that either succeeded or failed.
//!
//! `Outcome<T, E>` is the crate's two-variant sum type. It mirrors the shape of
//! `std::result::Result` but uses `Success`/`Failure` naming and carries the
//! combinators the binding scopes and zip functions are built on.
//!
//! Every combinator consumes or borrows the receiver and returns a new value;
//! nothing here mutates an existing `Outcome` in place.
//!
//! # Examples
//!
//! ```
//! use confluence::Outcome;
//!
//! let parsed = Outcome::<_, String>::success("42")
//!     .and_then(|s| match s.parse::<i32>() {
//!         Ok(n) => Outcome::success(n),
//!         Err(e) => Outcome::failure(e.to_string()),
//!     })
//!     .map(|n| n * 2);
//!
//! assert_eq!(parsed, Outcome::Success(84));
//! ```
//!
//! ## Converting from and to `Result`
//!
//! ```
//! use confluence::Outcome;
//!
//! let outcome: Outcome<i32, &str> = Err("boom").into();
//! assert!(outcome.is_failure());
//! assert_eq!(outcome.into_result(), Err("boom"));
//! ```

/// A computation outcome: either `Success(T)` or `Failure(E)`.
///
/// Exactly one variant is populated. Equality is structural over the payload.
///
/// # Example
///
/// ```rust
/// use confluence::Outcome;
///
/// let ok: Outcome<i32, &str> = Outcome::success(1);
/// let bad: Outcome<i32, &str> = Outcome::failure("nope");
///
/// match bad {
///     Outcome::Success(v) => println!("got {}", v),
///     Outcome::Failure(e) => println!("failed: {}", e),
/// }
/// assert_ne!(ok, Outcome::success(2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use = "this `Outcome` may be a `Failure`, which should be handled"]
pub enum Outcome<T, E> {
    /// The computation succeeded with a value
    Success(T),
    /// The computation failed with an error
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    // ========== Constructors ==========

    /// Create a successful outcome.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// let o = Outcome::<i32, String>::success(42);
    /// assert!(o.is_success());
    /// ```
    #[inline]
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    /// Create a failed outcome.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// let o = Outcome::<i32, &str>::failure("error");
    /// assert!(o.is_failure());
    /// ```
    #[inline]
    pub fn failure(error: E) -> Self {
        Outcome::Failure(error)
    }

    /// Create an outcome from a `Result`.
    #[inline]
    pub fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Failure(error),
        }
    }

    /// Convert this outcome into a `Result`.
    ///
    /// Useful at the boundary with code that uses `?`.
    #[inline]
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }

    // ========== Predicates ==========

    /// Returns `true` if this is a `Success`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// assert!(Outcome::<_, ()>::success(1).is_success());
    /// assert!(!Outcome::<(), _>::failure(1).is_success());
    /// ```
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns `true` if this is a `Failure`.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Returns `true` if this is a `Success` whose value satisfies `predicate`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// let o = Outcome::<_, ()>::success(5);
    /// assert!(o.is_success_and(|v| *v > 3));
    /// assert!(!o.is_success_and(|v| *v > 10));
    /// ```
    #[inline]
    pub fn is_success_and<F>(&self, predicate: F) -> bool
    where
        F: FnOnce(&T) -> bool,
    {
        match self {
            Outcome::Success(value) => predicate(value),
            Outcome::Failure(_) => false,
        }
    }

    /// Returns `true` if this is a `Failure` whose error satisfies `predicate`.
    #[inline]
    pub fn is_failure_and<F>(&self, predicate: F) -> bool
    where
        F: FnOnce(&E) -> bool,
    {
        match self {
            Outcome::Success(_) => false,
            Outcome::Failure(error) => predicate(error),
        }
    }

    // ========== Extractors ==========

    /// Returns the success value if present, discarding any error.
    #[inline]
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// Returns the error if present, discarding any success value.
    #[inline]
    pub fn err(self) -> Option<E> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    /// Borrow the payload of either variant.
    #[inline]
    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Mutably borrow the payload of either variant.
    #[inline]
    pub fn as_mut(&mut self) -> Outcome<&mut T, &mut E> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Returns the success value or `default`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// assert_eq!(Outcome::<_, &str>::success(3).unwrap_or(0), 3);
    /// assert_eq!(Outcome::<i32, _>::failure("x").unwrap_or(0), 0);
    /// ```
    #[inline]
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(_) => default,
        }
    }

    /// Returns the success value or computes one from the error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// let len = Outcome::<usize, &str>::failure("four").unwrap_or_else(|e| e.len());
    /// assert_eq!(len, 4);
    /// ```
    #[inline]
    pub fn unwrap_or_else<F>(self, f: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(error) => f(error),
        }
    }

    /// Returns the success value or `T::default()`.
    #[inline]
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(_) => T::default(),
        }
    }

    /// Returns the success value.
    ///
    /// # Panics
    ///
    /// Panics if this is a `Failure`, with the error's `Debug` output.
    #[inline]
    #[track_caller]
    pub fn unwrap(self) -> T
    where
        E: std::fmt::Debug,
    {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(error) => {
                panic!("called `Outcome::unwrap()` on a `Failure` value: {:?}", error)
            }
        }
    }

    /// Returns the error.
    ///
    /// # Panics
    ///
    /// Panics if this is a `Success`.
    #[inline]
    #[track_caller]
    pub fn unwrap_err(self) -> E
    where
        T: std::fmt::Debug,
    {
        match self {
            Outcome::Success(value) => {
                panic!("called `Outcome::unwrap_err()` on a `Success` value: {:?}", value)
            }
            Outcome::Failure(error) => error,
        }
    }

    /// Returns the success value, panicking with `msg` otherwise.
    #[inline]
    #[track_caller]
    pub fn expect(self, msg: &str) -> T
    where
        E: std::fmt::Debug,
    {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(error) => panic!("{}: {:?}", msg, error),
        }
    }

    /// Returns the error, panicking with `msg` otherwise.
    #[inline]
    #[track_caller]
    pub fn expect_err(self, msg: &str) -> E
    where
        T: std::fmt::Debug,
    {
        match self {
            Outcome::Success(value) => panic!("{}: {:?}", msg, value),
            Outcome::Failure(error) => error,
        }
    }

    // ========== Transformations ==========

    /// Transform the success value, leaving a failure untouched.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// let o = Outcome::<_, String>::success(5).map(|x| x * 2);
    /// assert_eq!(o, Outcome::Success(10));
    /// ```
    #[inline]
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Transform the error, leaving a success untouched.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// let o = Outcome::<i32, _>::failure("bad").map_err(|e| e.len());
    /// assert_eq!(o, Outcome::Failure(3));
    /// ```
    #[inline]
    pub fn map_err<E2, F>(self, f: F) -> Outcome<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(error) => Outcome::Failure(f(error)),
        }
    }

    /// Apply `f` to the success value or return `default`.
    #[inline]
    pub fn map_or<U, F>(self, default: U, f: F) -> U
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => f(value),
            Outcome::Failure(_) => default,
        }
    }

    /// Apply `on_failure` or `on_success` depending on the variant.
    #[inline]
    pub fn map_or_else<U, D, F>(self, on_failure: D, on_success: F) -> U
    where
        D: FnOnce(E) -> U,
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => on_success(value),
            Outcome::Failure(error) => on_failure(error),
        }
    }

    /// Collapse both variants into one value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// let msg = Outcome::<i32, &str>::failure("oops").fold(
    ///     |v| format!("value {}", v),
    ///     |e| format!("error {}", e),
    /// );
    /// assert_eq!(msg, "error oops");
    /// ```
    #[inline]
    pub fn fold<U, F, G>(self, on_success: F, on_failure: G) -> U
    where
        F: FnOnce(T) -> U,
        G: FnOnce(E) -> U,
    {
        match self {
            Outcome::Success(value) => on_success(value),
            Outcome::Failure(error) => on_failure(error),
        }
    }

    /// Chain a dependent computation.
    ///
    /// On success the result of `f(value)` replaces this outcome; a failure is
    /// propagated unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// fn half(n: i32) -> Outcome<i32, String> {
    ///     if n % 2 == 0 {
    ///         Outcome::success(n / 2)
    ///     } else {
    ///         Outcome::failure(format!("{} is odd", n))
    ///     }
    /// }
    ///
    /// assert_eq!(Outcome::success(8).and_then(half).and_then(half), Outcome::Success(2));
    /// assert_eq!(
    ///     Outcome::success(6).and_then(half).and_then(half),
    ///     Outcome::Failure("3 is odd".to_string())
    /// );
    /// ```
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Outcome<U, E>,
    {
        match self {
            Outcome::Success(value) => f(value),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Returns `other` if this is a success, otherwise this failure.
    #[inline]
    pub fn and<U>(self, other: Outcome<U, E>) -> Outcome<U, E> {
        match self {
            Outcome::Success(_) => other,
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Returns this success, otherwise `other`.
    #[inline]
    pub fn or<E2>(self, other: Outcome<T, E2>) -> Outcome<T, E2> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(_) => other,
        }
    }

    /// Returns this success, otherwise the result of `f(error)`.
    #[inline]
    pub fn or_else<E2, F>(self, f: F) -> Outcome<T, E2>
    where
        F: FnOnce(E) -> Outcome<T, E2>,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(error) => f(error),
        }
    }

    /// Turn any failure into a success by mapping the error to a value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// let o: Outcome<i32, std::convert::Infallible> =
    ///     Outcome::<i32, &str>::failure("missing").recover(|_| 0);
    /// assert_eq!(o, Outcome::Success(0));
    /// ```
    #[inline]
    pub fn recover<E2, F>(self, f: F) -> Outcome<T, E2>
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(error) => Outcome::Success(f(error)),
        }
    }

    /// Recover only the failures matching `predicate`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// let not_found = Outcome::<i32, _>::failure(404).recover_if(|c| *c == 404, |_| 0);
    /// assert_eq!(not_found, Outcome::Success(0));
    ///
    /// let server = Outcome::<i32, _>::failure(500).recover_if(|c| *c == 404, |_| 0);
    /// assert_eq!(server, Outcome::Failure(500));
    /// ```
    #[inline]
    pub fn recover_if<P, F>(self, predicate: P, f: F) -> Outcome<T, E>
    where
        P: FnOnce(&E) -> bool,
        F: FnOnce(E) -> T,
    {
        match self {
            Outcome::Failure(error) if predicate(&error) => Outcome::Success(f(error)),
            other => other,
        }
    }

    /// Pair this success with another, keeping the first failure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// let sum = Outcome::<_, &str>::success(1).zip_with(Outcome::success(2), |a, b| a + b);
    /// assert_eq!(sum, Outcome::Success(3));
    /// ```
    #[inline]
    pub fn zip_with<U, R, F>(self, other: Outcome<U, E>, f: F) -> Outcome<R, E>
    where
        F: FnOnce(T, U) -> R,
    {
        match (self, other) {
            (Outcome::Success(a), Outcome::Success(b)) => Outcome::Success(f(a, b)),
            (Outcome::Failure(e), _) | (_, Outcome::Failure(e)) => Outcome::Failure(e),
        }
    }

    /// Swap the variants.
    #[inline]
    pub fn swap(self) -> Outcome<E, T> {
        match self {
            Outcome::Success(value) => Outcome::Failure(value),
            Outcome::Failure(error) => Outcome::Success(error),
        }
    }

    /// Run a side effect on the success value and pass the outcome through.
    #[inline]
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Outcome::Success(value) = &self {
            f(value);
        }
        self
    }

    /// Run a side effect on the error and pass the outcome through.
    #[inline]
    pub fn inspect_err<F>(self, f: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Outcome::Failure(error) = &self {
            f(error);
        }
        self
    }

    /// Iterate over the success value (zero or one item).
    #[inline]
    pub fn iter(&self) -> std::option::IntoIter<&T> {
        self.as_ref().ok().into_iter()
    }
}

impl<T, E> Outcome<Outcome<T, E>, E> {
    /// Remove one level of nesting.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::Outcome;
    ///
    /// let nested = Outcome::<Outcome<i32, &str>, &str>::success(Outcome::failure("inner"));
    /// assert_eq!(nested.flatten(), Outcome::Failure("inner"));
    /// ```
    #[inline]
    pub fn flatten(self) -> Outcome<T, E> {
        self.and_then(|inner| inner)
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    #[inline]
    fn from(result: Result<T, E>) -> Self {
        Outcome::from_result(result)
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    #[inline]
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}

/// Values that a binding scope can unwrap: `Outcome` and `Result`.
pub trait IntoOutcome<E> {
    /// The success payload type.
    type Value;

    /// Convert into an `Outcome`.
    fn into_outcome(self) -> Outcome<Self::Value, E>;
}

impl<T, E> IntoOutcome<E> for Outcome<T, E> {
    type Value = T;

    #[inline]
    fn into_outcome(self) -> Outcome<T, E> {
        self
    }
}

impl<T, E> IntoOutcome<E> for Result<T, E> {
    type Value = T;

    #[inline]
    fn into_outcome(self) -> Outcome<T, E> {
        Outcome::from_result(self)
    }
}

impl<T, E> IntoIterator for Outcome<T, E> {
    type Item = T;
    type IntoIter = std::option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.ok().into_iter()
    }
}

impl<'a, T, E> IntoIterator for &'a Outcome<T, E> {
    type Item = &'a T;
    type IntoIter = std::option::IntoIter<&'a T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Constructors and predicates
    #[test]
    fn test_success_is_success_only() {
        let o = Outcome::<_, String>::success(42);
        assert!(o.is_success());
        assert!(!o.is_failure());
    }

    #[test]
    fn test_failure_is_failure_only() {
        let o = Outcome::<i32, _>::failure("error");
        assert!(o.is_failure());
        assert!(!o.is_success());
    }

    #[test]
    fn test_result_conversions() {
        assert_eq!(Outcome::from(Ok::<_, ()>(1)), Outcome::Success(1));
        assert_eq!(Outcome::from(Err::<(), _>("e")), Outcome::Failure("e"));
        let back: Result<i32, ()> = Outcome::success(7).into();
        assert_eq!(back, Ok(7));
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(
            Outcome::<_, ()>::success(vec![1, 2]),
            Outcome::success(vec![1, 2])
        );
        assert_ne!(Outcome::<i32, i32>::success(1), Outcome::failure(1));
    }

    #[test]
    fn test_optional_payload_is_not_a_third_state() {
        let o = Outcome::<Option<i32>, ()>::success(None);
        assert!(o.is_success());
    }

    // map / map_err
    #[test]
    fn test_map_only_touches_success() {
        assert_eq!(
            Outcome::<_, &str>::success(2).map(|x| x + 1),
            Outcome::Success(3)
        );
        assert_eq!(
            Outcome::<i32, _>::failure("e").map(|x| x + 1),
            Outcome::Failure("e")
        );
    }

    #[test]
    fn test_map_err_only_touches_failure() {
        assert_eq!(
            Outcome::<i32, &str>::success(2).map_err(str::len),
            Outcome::Success(2)
        );
        assert_eq!(
            Outcome::<i32, _>::failure("abc").map_err(str::len),
            Outcome::Failure(3)
        );
    }

    #[test]
    fn test_identity_maps_are_noops() {
        let s = Outcome::<_, String>::success("v".to_string());
        let f = Outcome::<String, _>::failure("e".to_string());
        assert_eq!(s.clone().map(|x| x).map_err(|e| e), s);
        assert_eq!(f.clone().map(|x| x).map_err(|e| e), f);
    }

    // and_then
    #[test]
    fn test_and_then_left_identity() {
        let f = |x: i32| Outcome::<i32, String>::success(x * 10);
        assert_eq!(Outcome::success(4).and_then(f), f(4));
    }

    #[test]
    fn test_and_then_on_failure_does_not_call() {
        let mut called = false;
        let o = Outcome::<i32, _>::failure("e").and_then(|x| {
            called = true;
            Outcome::success(x)
        });
        assert_eq!(o, Outcome::Failure("e"));
        assert!(!called);
    }

    // extractors
    #[test]
    fn test_unwrap_or_variants() {
        assert_eq!(Outcome::<_, ()>::success(1).unwrap_or(9), 1);
        assert_eq!(Outcome::<i32, _>::failure(()).unwrap_or(9), 9);
        assert_eq!(Outcome::<i32, _>::failure(4).unwrap_or_else(|e| e * 2), 8);
        assert_eq!(Outcome::<i32, _>::failure(()).unwrap_or_default(), 0);
    }

    #[test]
    #[should_panic(expected = "called `Outcome::unwrap()` on a `Failure` value")]
    fn test_unwrap_on_failure_panics() {
        Outcome::<i32, _>::failure("boom").unwrap();
    }

    #[test]
    fn test_ok_err() {
        assert_eq!(Outcome::<_, ()>::success(1).ok(), Some(1));
        assert_eq!(Outcome::<(), _>::failure(2).err(), Some(2));
        assert_eq!(Outcome::<(), i32>::success(()).err(), None);
    }

    // recovery
    #[test]
    fn test_or_else_and_recover() {
        let o = Outcome::<i32, &str>::failure("x").or_else(|_| Outcome::<_, ()>::success(1));
        assert_eq!(o, Outcome::Success(1));

        let o: Outcome<i32, ()> = Outcome::<i32, &str>::failure("x").recover(|e| e.len() as i32);
        assert_eq!(o, Outcome::Success(1));
    }

    #[test]
    fn test_recover_if_leaves_unmatched() {
        let o = Outcome::<i32, i32>::failure(1).recover_if(|e| *e == 2, |_| 0);
        assert_eq!(o, Outcome::Failure(1));
    }

    #[test]
    fn test_fold_and_swap() {
        assert_eq!(Outcome::<i32, i32>::success(1).fold(|v| v + 1, |e| e - 1), 2);
        assert_eq!(Outcome::<i32, &str>::success(1).swap(), Outcome::Failure(1));
    }

    #[test]
    fn test_zip_with_keeps_first_failure() {
        let o = Outcome::<i32, &str>::failure("a")
            .zip_with(Outcome::<i32, &str>::failure("b"), |x, y| x + y);
        assert_eq!(o, Outcome::Failure("a"));
    }

    #[test]
    fn test_inspect_runs_on_matching_variant() {
        let mut seen = Vec::new();
        let _ = Outcome::<i32, i32>::success(1)
            .inspect(|v| seen.push(*v))
            .inspect_err(|e| seen.push(*e * 100));
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn test_iteration() {
        let total: i32 = Outcome::<_, ()>::success(5).into_iter().sum();
        assert_eq!(total, 5);
        assert_eq!(Outcome::<i32, ()>::failure(()).iter().count(), 0);
    }

    #[test]
    fn test_flatten() {
        let nested = Outcome::<Outcome<i32, ()>, ()>::success(Outcome::success(1));
        assert_eq!(nested.flatten(), Outcome::Success(1));
    }
}

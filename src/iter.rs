//! Working with collections of outcomes.
//!
//! - **`combine`**: many outcomes into one, stopping at the first failure
//!   (also available as `collect::<Outcome<Vec<_>, _>>()`).
//! - **`combine_or_accumulate`**: many outcomes into one, keeping every failure.
//! - **`partition`**, **`successes`**, **`failures`**: split a collection
//!   without deciding on a single outcome.
//!
//! # Examples
//!
//! ```
//! use confluence::iter::{combine, combine_or_accumulate};
//! use confluence::Outcome;
//!
//! fn parse(s: &str) -> Outcome<i32, String> {
//!     s.parse().map_err(|_| format!("not a number: {}", s)).into()
//! }
//!
//! let all = combine(["1", "2", "3"].into_iter().map(parse));
//! assert_eq!(all, Outcome::Success(vec![1, 2, 3]));
//!
//! let first = combine(["1", "x", "y"].into_iter().map(parse));
//! assert_eq!(first, Outcome::Failure("not a number: x".to_string()));
//!
//! let every = combine_or_accumulate(["1", "x", "y"].into_iter().map(parse));
//! assert_eq!(
//!     every,
//!     Outcome::Failure(vec!["not a number: x".to_string(), "not a number: y".to_string()])
//! );
//! ```

use crate::Outcome;

impl<T, E, C> FromIterator<Outcome<T, E>> for Outcome<C, E>
where
    C: FromIterator<T>,
{
    /// Collects successes into `C`, stopping at the first failure.
    fn from_iter<I: IntoIterator<Item = Outcome<T, E>>>(iter: I) -> Self {
        iter.into_iter()
            .map(Outcome::into_result)
            .collect::<Result<C, E>>()
            .into()
    }
}

/// Combine outcomes into one, stopping at the first failure.
///
/// Items after the first failure are not pulled from the iterator.
///
/// # Example
///
/// ```rust
/// use confluence::iter::combine;
/// use confluence::Outcome;
///
/// let items = vec![Outcome::<_, &str>::success(1), Outcome::success(2)];
/// assert_eq!(combine(items), Outcome::Success(vec![1, 2]));
/// ```
pub fn combine<T, E, I>(iter: I) -> Outcome<Vec<T>, E>
where
    I: IntoIterator<Item = Outcome<T, E>>,
{
    iter.into_iter().collect()
}

/// Combine outcomes into one, collecting every failure in order.
///
/// Successful values are discarded if anything failed.
pub fn combine_or_accumulate<T, E, I>(iter: I) -> Outcome<Vec<T>, Vec<E>>
where
    I: IntoIterator<Item = Outcome<T, E>>,
{
    let (successes, failures) = partition(iter);
    if failures.is_empty() {
        Outcome::Success(successes)
    } else {
        Outcome::Failure(failures)
    }
}

/// Split outcomes into success values and failure values, preserving order.
///
/// # Example
///
/// ```rust
/// use confluence::iter::partition;
/// use confluence::Outcome;
///
/// let items = vec![
///     Outcome::success(1),
///     Outcome::failure("bad"),
///     Outcome::success(3),
/// ];
/// let (ok, bad) = partition(items);
/// assert_eq!(ok, vec![1, 3]);
/// assert_eq!(bad, vec!["bad"]);
/// ```
pub fn partition<T, E, I>(iter: I) -> (Vec<T>, Vec<E>)
where
    I: IntoIterator<Item = Outcome<T, E>>,
{
    let mut successes = Vec::new();
    let mut failures = Vec::new();

    for item in iter {
        match item {
            Outcome::Success(value) => successes.push(value),
            Outcome::Failure(error) => failures.push(error),
        }
    }

    (successes, failures)
}

/// Extract all success values from an iterator.
pub fn successes<T, E, I>(iter: I) -> impl Iterator<Item = T>
where
    I: IntoIterator<Item = Outcome<T, E>>,
{
    iter.into_iter().filter_map(Outcome::ok)
}

/// Extract all failure values from an iterator.
pub fn failures<T, E, I>(iter: I) -> impl Iterator<Item = E>
where
    I: IntoIterator<Item = Outcome<T, E>>,
{
    iter.into_iter().filter_map(Outcome::err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_short_circuits() {
        let mut pulled = 0;
        let items = [Outcome::success(1), Outcome::failure("a"), Outcome::failure("b")];
        let result: Outcome<Vec<i32>, &str> = items
            .into_iter()
            .inspect(|_| pulled += 1)
            .collect();

        assert_eq!(result, Outcome::Failure("a"));
        assert_eq!(pulled, 2);
    }

    #[test]
    fn test_collect_into_other_containers() {
        let items = vec![Outcome::<_, ()>::success('a'), Outcome::success('b')];
        let text: Outcome<String, ()> = items.into_iter().collect();
        assert_eq!(text, Outcome::Success("ab".to_string()));
    }

    #[test]
    fn test_combine_empty() {
        let empty: Vec<Outcome<i32, String>> = Vec::new();
        assert_eq!(combine(empty), Outcome::Success(vec![]));
    }

    #[test]
    fn test_combine_or_accumulate() {
        let ok = vec![Outcome::<_, &str>::success(1), Outcome::success(2)];
        assert_eq!(combine_or_accumulate(ok), Outcome::Success(vec![1, 2]));

        let mixed = vec![
            Outcome::failure("first"),
            Outcome::success(2),
            Outcome::failure("second"),
        ];
        assert_eq!(
            combine_or_accumulate(mixed),
            Outcome::Failure(vec!["first", "second"])
        );
    }

    #[test]
    fn test_successes_and_failures() {
        let items = vec![
            Outcome::success(1),
            Outcome::failure("x"),
            Outcome::success(2),
            Outcome::failure("y"),
        ];
        assert_eq!(successes(items.clone()).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(failures(items).collect::<Vec<_>>(), vec!["x", "y"]);
    }
}

//! Wrapping panicking computations into `Outcome`.
//!
//! [`catching`] runs a closure under `catch_unwind` and turns a panic into
//! `Failure(Panicked)`. Some panics must never be swallowed this way: a panic
//! raised with a [`Fatal`] payload is always re-raised, and [`catching_with`]
//! lets the caller widen that class with a predicate.
//!
//! The control signals used by [`binding`](crate::binding) and
//! `concurrent_binding` are plain return values, not panics, so they pass
//! through this module untouched:
//!
//! ```
//! use confluence::{binding, catching, Outcome};
//!
//! let result = binding(|scope| {
//!     // The failed bind is a value inside the catch, and `?` still unwinds.
//!     let inner = catching(|| scope.bind(Outcome::<i32, _>::failure("nope")));
//!     let value = inner.unwrap_or_else(|p| panic!("unexpected panic: {}", p))?;
//!     Ok(value)
//! });
//!
//! assert_eq!(result, Outcome::Failure("nope"));
//! ```

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

use crate::Outcome;

/// Panic payload type that [`catching`] never captures.
///
/// Raise it with `std::panic::panic_any(Fatal::new(..))` for conditions that
/// must tear down the caller rather than become a `Failure`.
///
/// # Example
///
/// ```rust,should_panic
/// use confluence::catch::{catching, Fatal};
///
/// let _ = catching(|| -> i32 { std::panic::panic_any(Fatal::new("invariant broken")) });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fatal {
    reason: String,
}

impl Fatal {
    /// Create a fatal payload with a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Fatal {
            reason: reason.into(),
        }
    }

    /// The reason given when the payload was created.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fatal: {}", self.reason)
    }
}

impl std::error::Error for Fatal {}

/// A panic captured by [`catching`].
///
/// Holds the panic message when the payload was a `&str` or `String`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panicked {
    message: String,
}

impl Panicked {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Panicked { message }
    }

    /// The panic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Panicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panicked: {}", self.message)
    }
}

impl std::error::Error for Panicked {}

fn is_fatal_payload(payload: &(dyn Any + Send)) -> bool {
    payload.is::<Fatal>()
}

fn settle<T>(
    caught: std::thread::Result<T>,
    is_fatal: impl FnOnce(&(dyn Any + Send)) -> bool,
) -> Outcome<T, Panicked> {
    match caught {
        Ok(value) => Outcome::Success(value),
        Err(payload) => {
            if is_fatal_payload(payload.as_ref()) || is_fatal(payload.as_ref()) {
                panic::resume_unwind(payload)
            }
            let panicked = Panicked::from_payload(payload.as_ref());
            #[cfg(feature = "tracing")]
            tracing::debug!(message = %panicked.message, "captured panic as failure");
            Outcome::Failure(panicked)
        }
    }
}

/// Run `f`, turning a panic into `Failure(Panicked)`.
///
/// Panics carrying a [`Fatal`] payload are re-raised.
///
/// # Example
///
/// ```rust
/// use confluence::catch::catching;
///
/// let ok = catching(|| 1 + 1);
/// assert_eq!(ok.unwrap(), 2);
///
/// let failed = catching(|| -> i32 { panic!("divide by zero") });
/// assert_eq!(failed.unwrap_err().message(), "divide by zero");
/// ```
pub fn catching<T, F>(f: F) -> Outcome<T, Panicked>
where
    F: FnOnce() -> T,
{
    catching_with(f, |_| false)
}

/// Like [`catching`], with an extra predicate marking payloads that must be re-raised.
///
/// # Example
///
/// ```rust,should_panic
/// use confluence::catch::catching_with;
///
/// struct Shutdown;
///
/// let _ = catching_with(
///     || -> () { std::panic::panic_any(Shutdown) },
///     |payload| payload.is::<Shutdown>(),
/// );
/// ```
pub fn catching_with<T, F, P>(f: F, is_fatal: P) -> Outcome<T, Panicked>
where
    F: FnOnce() -> T,
    P: FnOnce(&(dyn Any + Send)) -> bool,
{
    settle(panic::catch_unwind(AssertUnwindSafe(f)), is_fatal)
}

/// Await `future`, turning a panic during polling into `Failure(Panicked)`.
///
/// Dropping the returned future (for example when a scope is cancelled) drops
/// `future` without producing an outcome; cancellation is never captured.
///
/// # Example
///
/// ```rust
/// use confluence::catch::catching_async;
///
/// # tokio_test::block_on(async {
/// let failed = catching_async(async { panic!("lost connection") }).await;
/// let _: &confluence::Outcome<(), _> = &failed;
/// assert!(failed.is_failure());
/// # });
/// ```
pub async fn catching_async<Fut>(future: Fut) -> Outcome<Fut::Output, Panicked>
where
    Fut: Future,
{
    let caught = AssertUnwindSafe(future).catch_unwind().await;
    settle(caught, |_| false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catching_success() {
        assert_eq!(catching(|| "fine"), Outcome::Success("fine"));
    }

    #[test]
    fn test_catching_str_panic() {
        let o = catching(|| -> () { panic!("bad input") });
        assert_eq!(o.unwrap_err().message(), "bad input");
    }

    #[test]
    fn test_catching_formatted_panic() {
        let o = catching(|| -> () { panic!("code {}", 7) });
        assert_eq!(o.unwrap_err().to_string(), "panicked: code 7");
    }

    #[test]
    fn test_catching_opaque_payload() {
        let o = catching(|| -> () { std::panic::panic_any(17_u8) });
        assert_eq!(o.unwrap_err().message(), "Box<dyn Any>");
    }

    #[test]
    fn test_fatal_is_reraised() {
        let outer = std::panic::catch_unwind(|| {
            let _ = catching(|| -> () { std::panic::panic_any(Fatal::new("stop")) });
        });
        let payload = outer.unwrap_err();
        let fatal = payload.downcast_ref::<Fatal>().unwrap();
        assert_eq!(fatal.reason(), "stop");
    }

    #[test]
    fn test_catching_with_custom_class() {
        #[derive(Debug)]
        struct Abort;

        let outer = std::panic::catch_unwind(|| {
            let _ = catching_with(|| -> () { std::panic::panic_any(Abort) }, |p| p.is::<Abort>());
        });
        assert!(outer.unwrap_err().is::<Abort>());

        let captured = catching_with(|| -> () { panic!("ordinary") }, |p| p.is::<Abort>());
        assert!(captured.is_failure());
    }

    #[tokio::test]
    async fn test_catching_async() {
        assert_eq!(catching_async(async { 3 }).await, Outcome::Success(3));

        let failed = catching_async(async {
            tokio::task::yield_now().await;
            panic!("mid-flight")
        })
        .await;
        let failed: Outcome<(), Panicked> = failed;
        assert_eq!(failed.unwrap_err().message(), "mid-flight");
    }
}

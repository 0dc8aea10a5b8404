//! Entry points and configuration for concurrent binding scopes.

use std::future::Future;
use std::sync::Arc;

use crate::concurrent::scope::{CancelOnDrop, Shared};
use crate::concurrent::{ConcurrentScope, TaskUnwind};
use crate::Outcome;

/// What a concurrent scope does with its other tasks once a failure is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CancelPolicy {
    /// Cancel the block and every child as soon as the first failure is recorded.
    #[default]
    Eager,
    /// Record the first failure but let every other task run to completion.
    ///
    /// Tasks that later bind a failure still end with `TaskUnwind`, and the
    /// scope still resolves to the first recorded failure.
    Lazy,
}

/// Configuration for a concurrent binding scope.
///
/// # Example
///
/// ```rust
/// use confluence::concurrent::{CancelPolicy, ConcurrentBinding};
/// use confluence::Outcome;
///
/// # tokio_test::block_on(async {
/// let result = ConcurrentBinding::new()
///     .cancel_policy(CancelPolicy::Lazy)
///     .name("load-dashboard")
///     .run(|scope| async move {
///         let widgets = scope.spawn(async { Ok(vec!["clock", "weather"]) });
///         let widgets = widgets.await?;
///         scope.bind(Outcome::<_, String>::success(widgets.len()))
///     })
///     .await;
///
/// assert_eq!(result, Outcome::Success(2));
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConcurrentBinding {
    policy: CancelPolicy,
    name: Option<String>,
}

impl ConcurrentBinding {
    /// Eager cancellation, no name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cancellation policy.
    pub fn cancel_policy(mut self, policy: CancelPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Name the scope. The name shows up in log events and diagnostics.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Run `block` in a new concurrent scope and resolve to its outcome.
    ///
    /// The block itself runs on the calling task; children run on the ambient
    /// tokio runtime.
    pub async fn run<V, E, F, Fut>(self, block: F) -> Outcome<V, E>
    where
        E: Send + 'static,
        F: FnOnce(ConcurrentScope<E>) -> Fut,
        Fut: Future<Output = Result<V, TaskUnwind>>,
    {
        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!(
            "concurrent_binding",
            name = self.name.as_deref().unwrap_or(""),
            policy = ?self.policy
        );

        let future = self.run_scope(block);
        #[cfg(feature = "tracing")]
        let future = tracing::Instrument::instrument(future, span);
        future.await
    }

    async fn run_scope<V, E, F, Fut>(self, block: F) -> Outcome<V, E>
    where
        E: Send + 'static,
        F: FnOnce(ConcurrentScope<E>) -> Fut,
        Fut: Future<Output = Result<V, TaskUnwind>>,
    {
        let shared = Arc::new(Shared::new(self.policy, self.name));
        let _cancel_on_drop = CancelOnDrop {
            shared: Arc::clone(&shared),
        };

        let scope = ConcurrentScope {
            shared: Arc::clone(&shared),
        };
        let returned = shared.guarded(block(scope)).await;
        shared.settled().await;

        let outcome = shared.resolve(returned);
        #[cfg(feature = "tracing")]
        tracing::debug!(failed = outcome.is_failure(), "scope resolved");
        outcome
    }
}

/// Run `block` in a new concurrent scope with eager cancellation.
///
/// Shorthand for `ConcurrentBinding::new().run(block)`.
pub async fn concurrent_binding<V, E, F, Fut>(block: F) -> Outcome<V, E>
where
    E: Send + 'static,
    F: FnOnce(ConcurrentScope<E>) -> Fut,
    Fut: Future<Output = Result<V, TaskUnwind>>,
{
    ConcurrentBinding::new().run(block).await
}

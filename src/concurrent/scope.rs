//! Shared state of one concurrent binding scope and the handle given to tasks.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::sync::{oneshot, Notify};

use crate::concurrent::{CancelPolicy, Child};
use crate::outcome::IntoOutcome;
use crate::Outcome;

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Signal returned when a task inside a concurrent scope must stop.
///
/// Produced by a failed [`ConcurrentScope::bind`], by a cancelled scope, and by
/// awaiting a [`Child`] that did not complete normally. It cannot be built
/// outside this crate; return it from the task (usually with `?`).
#[must_use = "a `TaskUnwind` must be returned from the task to end it"]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TaskUnwind {
    pub(crate) scope: u64,
}

impl fmt::Debug for TaskUnwind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskUnwind(scope #{})", self.scope)
    }
}

pub(crate) struct Shared<E> {
    id: u64,
    name: Option<String>,
    policy: CancelPolicy,
    failure: Mutex<Option<E>>,
    panic: Mutex<Option<Box<dyn Any + Send>>>,
    cancelled: AtomicBool,
    cancel_notify: Notify,
    active: AtomicUsize,
    idle: Notify,
}

impl<E> Shared<E> {
    pub(crate) fn new(policy: CancelPolicy, name: Option<String>) -> Self {
        Shared {
            id: NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed),
            name,
            policy,
            failure: Mutex::new(None),
            panic: Mutex::new(None),
            cancelled: AtomicBool::new(false),
            cancel_notify: Notify::new(),
            active: AtomicUsize::new(0),
            idle: Notify::new(),
        }
    }

    fn unwind(&self) -> TaskUnwind {
        TaskUnwind { scope: self.id }
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Cancels the scope because a failure or a panic was recorded.
    pub(crate) fn cancel(&self) {
        if self.close() {
            #[cfg(feature = "tracing")]
            tracing::debug!(scope = self.id, name = self.label(), "cancelling scope");
        }
    }

    /// Sets the cancelled flag and wakes waiters. Returns `false` if it was already set.
    fn close(&self) -> bool {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.cancel_notify.notify_waiters();
        true
    }

    pub(crate) async fn cancelled(&self) {
        loop {
            let notified = self.cancel_notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Stores `error` if no failure has been recorded yet; later errors are dropped.
    fn record(&self, error: E) {
        let won = {
            let mut slot = lock(&self.failure);
            if slot.is_none() {
                *slot = Some(error);
                true
            } else {
                false
            }
        };
        if !won {
            #[cfg(feature = "tracing")]
            tracing::trace!(scope = self.id, "later failure discarded");
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(scope = self.id, name = self.label(), "first failure recorded");
        if self.policy == CancelPolicy::Eager {
            self.cancel();
        }
    }

    fn record_panic(&self, payload: Box<dyn Any + Send>) {
        #[cfg(feature = "tracing")]
        tracing::warn!(scope = self.id, name = self.label(), "child task panicked");
        {
            let mut slot = lock(&self.panic);
            if slot.is_none() {
                *slot = Some(payload);
            }
        }
        self.cancel();
    }

    /// Runs `future` until it completes or the scope is cancelled.
    pub(crate) async fn guarded<T, Fut>(&self, future: Fut) -> Result<T, TaskUnwind>
    where
        Fut: Future<Output = Result<T, TaskUnwind>>,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(self.unwind()),
            result = future => result,
        }
    }

    /// Waits until every spawned child has settled.
    pub(crate) async fn settled(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.active.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Turns the block's return value into the scope's outcome.
    ///
    /// A child panic is re-raised here, after all children have settled.
    pub(crate) fn resolve<V>(&self, returned: Result<V, TaskUnwind>) -> Outcome<V, E> {
        if let Some(payload) = lock(&self.panic).take() {
            std::panic::resume_unwind(payload);
        }
        let failure = lock(&self.failure).take();
        match (returned, failure) {
            (_, Some(error)) => Outcome::Failure(error),
            (Ok(value), None) => Outcome::Success(value),
            (Err(unwind), None) => panic!(
                "concurrent scope #{} ({}) ended with {:?} but recorded no failure; \
                 the signal came from a `bind`/`checkpoint` on another scope's handle \
                 or from a child handle awaited outside the scope that spawned it",
                self.id,
                self.label(),
                unwind
            ),
        }
    }
}

/// Decrements the active-children count when a child task ends, however it ends.
struct ActiveGuard<E> {
    shared: Arc<Shared<E>>,
}

impl<E> ActiveGuard<E> {
    fn enter(shared: Arc<Shared<E>>) -> Self {
        shared.active.fetch_add(1, Ordering::AcqRel);
        ActiveGuard { shared }
    }
}

impl<E> Drop for ActiveGuard<E> {
    fn drop(&mut self) {
        if self.shared.active.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.shared.idle.notify_waiters();
        }
    }
}

/// Stops any remaining children when the scope future is dropped or finishes.
///
/// Closing here is teardown, not a failure, so it is not logged.
pub(crate) struct CancelOnDrop<E> {
    pub(crate) shared: Arc<Shared<E>>,
}

impl<E> Drop for CancelOnDrop<E> {
    fn drop(&mut self) {
        self.shared.close();
    }
}

/// Handle to a running concurrent binding scope.
///
/// Cheap to clone; every clone refers to the same scope. The handle can spawn
/// children into the scope and unwrap outcomes on its behalf.
///
/// A [`TaskUnwind`] only ends the scope that produced it. Inside a nested
/// scope's block, bind with the inner handle and hand the result outward as
/// an `Outcome`. Ending the inner block with a signal from an outer handle (or
/// from awaiting an outer scope's [`Child`]) leaves the inner scope with no
/// recorded failure, and it panics.
pub struct ConcurrentScope<E> {
    pub(crate) shared: Arc<Shared<E>>,
}

impl<E> Clone for ConcurrentScope<E> {
    fn clone(&self) -> Self {
        ConcurrentScope {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<E> fmt::Debug for ConcurrentScope<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentScope")
            .field("id", &self.shared.id)
            .field("name", &self.shared.name)
            .field("policy", &self.shared.policy)
            .field("cancelled", &self.shared.is_cancelled())
            .field("active", &self.shared.active.load(Ordering::Relaxed))
            .finish()
    }
}

impl<E> ConcurrentScope<E> {
    /// Unwrap an `Outcome` or `Result` on behalf of this scope.
    ///
    /// Checks for cancellation first: once the scope is cancelled every call
    /// returns [`TaskUnwind`], even for a success, and leaves the recorded
    /// failure untouched. Otherwise a success returns its value and a failure
    /// is offered to the scope (first one wins) before returning the signal.
    pub fn bind<B>(&self, value: B) -> Result<B::Value, TaskUnwind>
    where
        B: IntoOutcome<E>,
    {
        if self.shared.is_cancelled() {
            return Err(self.shared.unwind());
        }
        match value.into_outcome() {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => {
                self.shared.record(error);
                Err(self.shared.unwind())
            }
        }
    }

    /// Fail the scope with `error` unless `condition` holds.
    pub fn ensure(&self, condition: bool, error: impl FnOnce() -> E) -> Result<(), TaskUnwind> {
        if condition {
            self.checkpoint()
        } else {
            self.bind(Outcome::<(), E>::Failure(error()))
        }
    }

    /// Returns `true` once the scope has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.shared.is_cancelled()
    }

    /// Returns `Err(TaskUnwind)` if the scope has been cancelled.
    ///
    /// Long-running synchronous stretches inside a task can call this to stop
    /// early; awaiting already checks at every suspension point.
    pub fn checkpoint(&self) -> Result<(), TaskUnwind> {
        if self.shared.is_cancelled() {
            Err(self.shared.unwind())
        } else {
            Ok(())
        }
    }

    /// Completes when the scope is cancelled.
    pub async fn cancelled(&self) {
        self.shared.cancelled().await
    }

    /// The cancellation policy this scope runs with.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::concurrent::{CancelPolicy, ConcurrentBinding};
    /// use confluence::Outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let policy = ConcurrentBinding::new()
    ///     .cancel_policy(CancelPolicy::Lazy)
    ///     .run(|scope| async move { scope.bind(Outcome::<_, String>::success(scope.policy())) })
    ///     .await;
    ///
    /// assert_eq!(policy, Outcome::Success(CancelPolicy::Lazy));
    /// # });
    /// ```
    pub fn policy(&self) -> CancelPolicy {
        self.shared.policy
    }
}

impl<E: Send + 'static> ConcurrentScope<E> {
    /// Spawn a child task owned by this scope.
    ///
    /// The child runs on the ambient tokio runtime and races against the
    /// scope's cancellation. The scope does not resolve until it has settled.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, like `tokio::spawn`.
    pub fn spawn<T, Fut>(&self, future: Fut) -> Child<T>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T, TaskUnwind>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let guard = ActiveGuard::enter(Arc::clone(&self.shared));
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            let _guard = guard;
            let caught = AssertUnwindSafe(shared.guarded(future)).catch_unwind().await;
            match caught {
                Ok(result) => {
                    // The handle may have been dropped; the result is then unused.
                    let _ = tx.send(result);
                }
                Err(payload) => shared.record_panic(payload),
            }
        });

        Child::new(rx, self.shared.id)
    }

    /// Spawn a child task that receives its own clone of this handle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use confluence::{concurrent_binding, Outcome};
    ///
    /// # tokio_test::block_on(async {
    /// let result = concurrent_binding(|scope| async move {
    ///     let a = scope.spawn_with(|s| async move { s.bind(Outcome::<_, String>::success(20)) });
    ///     let b = scope.spawn_with(|s| async move { s.bind(Outcome::<_, String>::success(22)) });
    ///     Ok(a.await? + b.await?)
    /// })
    /// .await;
    ///
    /// assert_eq!(result, Outcome::Success(42));
    /// # });
    /// ```
    pub fn spawn_with<T, F, Fut>(&self, task: F) -> Child<T>
    where
        T: Send + 'static,
        F: FnOnce(ConcurrentScope<E>) -> Fut,
        Fut: Future<Output = Result<T, TaskUnwind>> + Send + 'static,
    {
        self.spawn(task(self.clone()))
    }
}

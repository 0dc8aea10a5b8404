//! Handle to a child task spawned into a concurrent scope.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::concurrent::TaskUnwind;

/// A child task spawned with [`ConcurrentScope::spawn`](crate::concurrent::ConcurrentScope::spawn).
///
/// Await it to get the child's value. A child that unwound, was cancelled, or
/// panicked yields `Err(TaskUnwind)`, so `child.await?` stops the awaiting task
/// too. Dropping the handle does not stop the child; the scope still waits for it.
#[derive(Debug)]
#[must_use = "a `Child` does nothing to the awaiting task unless awaited"]
pub struct Child<T> {
    rx: oneshot::Receiver<Result<T, TaskUnwind>>,
    scope: u64,
}

impl<T> Child<T> {
    pub(crate) fn new(rx: oneshot::Receiver<Result<T, TaskUnwind>>, scope: u64) -> Self {
        Child { rx, scope }
    }
}

impl<T> Future for Child<T> {
    type Output = Result<T, TaskUnwind>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // Sender dropped without a value: the child panicked or was torn down.
            Poll::Ready(Err(_)) => Poll::Ready(Err(TaskUnwind { scope: this.scope })),
            Poll::Pending => Poll::Pending,
        }
    }
}

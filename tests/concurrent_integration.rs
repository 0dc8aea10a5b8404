//! Integration tests for concurrent binding scopes and async zips.
//!
//! These model a small order pipeline: independent lookups run as children of
//! one scope, and any lookup failure fails the order.

#![cfg(feature = "async")]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use confluence::concurrent::CancelPolicy;
use confluence::{
    binding, concurrent_binding, zip_async, zip_or_accumulate_async, ConcurrentBinding, Outcome,
};
use tokio::time::{sleep, Instant};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum OrderError {
    UnknownCustomer(u32),
    OutOfStock(&'static str),
    CardDeclined,
}

struct Backend {
    stock: HashMap<&'static str, u32>,
    calls: AtomicUsize,
}

impl Backend {
    fn new() -> Arc<Self> {
        Arc::new(Backend {
            stock: HashMap::from([("lamp", 3), ("desk", 0), ("chair", 12)]),
            calls: AtomicUsize::new(0),
        })
    }

    async fn customer(&self, id: u32) -> Outcome<String, OrderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sleep(Duration::from_millis(10)).await;
        if id == 7 {
            Outcome::success("Grace".to_string())
        } else {
            Outcome::failure(OrderError::UnknownCustomer(id))
        }
    }

    async fn reserve(&self, item: &'static str) -> Outcome<u32, OrderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sleep(Duration::from_millis(20)).await;
        match self.stock.get(item) {
            Some(&n) if n > 0 => Outcome::success(n),
            _ => Outcome::failure(OrderError::OutOfStock(item)),
        }
    }

    async fn charge(&self, amount: u32) -> Result<u32, OrderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sleep(Duration::from_millis(50)).await;
        if amount < 1_000 {
            Ok(amount)
        } else {
            Err(OrderError::CardDeclined)
        }
    }
}

async fn place_order(
    backend: Arc<Backend>,
    customer: u32,
    item: &'static str,
    amount: u32,
) -> Outcome<String, OrderError> {
    concurrent_binding(|scope| async move {
        let b = Arc::clone(&backend);
        let who = scope.spawn_with(move |s| async move { s.bind(b.customer(customer).await) });
        let b = Arc::clone(&backend);
        let stock = scope.spawn_with(move |s| async move { s.bind(b.reserve(item).await) });
        let b = Arc::clone(&backend);
        let paid = scope.spawn_with(move |s| async move { s.bind(b.charge(amount).await) });

        let who = who.await?;
        let stock = stock.await?;
        let paid = paid.await?;
        scope.ensure(stock >= 1, || OrderError::OutOfStock(item))?;
        Ok(format!("{} bought a {} for {}", who, item, paid))
    })
    .await
}

// ============================================================================
// Concurrent scope
// ============================================================================

#[tokio::test(start_paused = true)]
async fn order_succeeds_when_every_lookup_succeeds() {
    let start = Instant::now();
    let result = place_order(Backend::new(), 7, "lamp", 40).await;

    assert_eq!(result, Outcome::Success("Grace bought a lamp for 40".to_string()));
    // Children ran concurrently: total time is the slowest lookup.
    assert_eq!(start.elapsed(), Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn earliest_failure_cancels_the_slower_lookups() {
    let start = Instant::now();
    let result = place_order(Backend::new(), 1, "desk", 5_000).await;

    // Customer lookup fails at 10ms, before the stock (20ms) and card (50ms) failures.
    assert_eq!(result, Outcome::Failure(OrderError::UnknownCustomer(1)));
    assert_eq!(start.elapsed(), Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn lazy_policy_waits_for_every_lookup_but_keeps_the_first_failure() {
    let backend = Backend::new();
    let b = Arc::clone(&backend);
    let start = Instant::now();

    let result = ConcurrentBinding::new()
        .cancel_policy(CancelPolicy::Lazy)
        .name("audit")
        .run(|scope| async move {
            let stock = scope.spawn_with({
                let b = Arc::clone(&b);
                move |s| async move { s.bind(b.reserve("desk").await) }
            });
            let paid = scope.spawn_with({
                let b = Arc::clone(&b);
                move |s| async move { s.bind(b.charge(5_000).await) }
            });
            Ok(stock.await? + paid.await?)
        })
        .await;

    assert_eq!(result, Outcome::Failure(OrderError::OutOfStock("desk")));
    assert_eq!(start.elapsed(), Duration::from_millis(50));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn sync_binding_inside_a_child() {
    let result = concurrent_binding(|scope| async move {
        let parsed = scope.spawn_with(|s| async move {
            let inner = binding(|inner| {
                let a = inner.bind("20".parse::<u32>().map_err(|e| e.to_string()))?;
                let b = inner.bind("22".parse::<u32>().map_err(|e| e.to_string()))?;
                Ok(a + b)
            });
            s.bind(inner)
        });
        parsed.await
    })
    .await;

    assert_eq!(result, Outcome::Success(42));
}

// ============================================================================
// Async zip
// ============================================================================

#[tokio::test(start_paused = true)]
async fn zip_async_combines_lookups_concurrently() {
    let backend = Backend::new();
    let start = Instant::now();

    let result = zip_async(
        (backend.customer(7), backend.reserve("chair"), backend.charge(90)),
        |(who, stock, paid)| format!("{}:{}:{}", who, stock, paid),
    )
    .await;

    assert_eq!(result, Outcome::Success("Grace:12:90".to_string()));
    assert_eq!(start.elapsed(), Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn zip_or_accumulate_async_reports_every_failure_in_order() {
    let backend = Backend::new();

    let result = zip_or_accumulate_async(
        (backend.charge(5_000), backend.customer(3), backend.reserve("desk")),
        |(paid, who, stock)| format!("{}:{}:{}", who, stock, paid),
    )
    .await;

    assert_eq!(
        result,
        Outcome::Failure(vec![
            OrderError::CardDeclined,
            OrderError::UnknownCustomer(3),
            OrderError::OutOfStock("desk"),
        ])
    );
}

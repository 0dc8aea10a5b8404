//! Concurrent binding scopes on tokio.
//!
//! [`concurrent_binding`] runs an async block with a [`ConcurrentScope`]
//! handle. The block may spawn any number of child tasks; any of them (and the
//! block itself) may unwrap outcomes with [`ConcurrentScope::bind`].
//!
//! - The scope resolves only after the block and every child have settled.
//! - The first failed `bind` is recorded (under a mutex) and, with the default
//!   [`CancelPolicy::Eager`], cancels the block and all children.
//! - Cancellation is cooperative: a task stops at its next suspension point,
//!   where it finds the scope cancelled and ends with [`TaskUnwind`]. Work
//!   between two suspension points is not interrupted.
//! - Each scope is its own cancellation domain. A nested scope only affects
//!   its parent through the `Outcome` it resolves to.
//! - Panics are not converted into failures. A panicking child cancels the
//!   scope, the scope waits for the other children, then re-raises the panic.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use confluence::{concurrent_binding, Outcome};
//!
//! async fn fetch_price(sku: &'static str) -> Outcome<u32, String> {
//!     tokio::time::sleep(Duration::from_millis(5)).await;
//!     match sku {
//!         "apple" => Outcome::success(3),
//!         "pear" => Outcome::success(4),
//!         other => Outcome::failure(format!("unknown sku {}", other)),
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let total = concurrent_binding(|scope| async move {
//!     let apple = scope.spawn_with(|s| async move { s.bind(fetch_price("apple").await) });
//!     let pear = scope.spawn_with(|s| async move { s.bind(fetch_price("pear").await) });
//!     Ok(apple.await? + pear.await?)
//! })
//! .await;
//! assert_eq!(total, Outcome::Success(7));
//!
//! let missing = concurrent_binding(|scope| async move {
//!     let apple = scope.spawn_with(|s| async move { s.bind(fetch_price("apple").await) });
//!     let kiwi = scope.spawn_with(|s| async move { s.bind(fetch_price("kiwi").await) });
//!     Ok(apple.await? + kiwi.await?)
//! })
//! .await;
//! assert_eq!(missing, Outcome::Failure("unknown sku kiwi".to_string()));
//! # });
//! ```

mod builder;
mod child;
mod scope;

pub use builder::{concurrent_binding, CancelPolicy, ConcurrentBinding};
pub use child::Child;
pub use scope::{ConcurrentScope, TaskUnwind};

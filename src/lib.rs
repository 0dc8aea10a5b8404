//! # Confluence
//!
//! Typed failures that stay values, and scopes that unwrap them.
//!
//! A computation that can fail returns an [`Outcome`]: `Success(T)` or
//! `Failure(E)`. Instead of threading `match`es through every step, run the
//! steps inside a scope and `bind` each outcome:
//!
//! - [`binding`] runs a synchronous block. The first failed `bind` ends the
//!   block and becomes the scope's result.
//! - [`concurrent_binding`] runs an async block that may spawn children on
//!   tokio. The first failure anywhere wins, cancels the rest, and the scope
//!   still waits for every child before it resolves.
//! - [`zip`] and [`zip_or_accumulate`] combine independent producers, either
//!   failing fast or collecting every failure.
//!
//! ## Quick Example
//!
//! ```rust
//! use confluence::{binding, Outcome};
//!
//! fn parse_port(raw: &str) -> Outcome<u16, String> {
//!     raw.parse().map_err(|_| format!("invalid port: {}", raw)).into()
//! }
//!
//! fn check_range(port: u16) -> Outcome<u16, String> {
//!     if port >= 1024 {
//!         Outcome::success(port)
//!     } else {
//!         Outcome::failure(format!("port {} is privileged", port))
//!     }
//! }
//!
//! let ok = binding(|scope| {
//!     let port = scope.bind(parse_port("8080"))?;
//!     let port = scope.bind(check_range(port))?;
//!     Ok(port + 1)
//! });
//! assert_eq!(ok, Outcome::Success(8081));
//!
//! let bad = binding(|scope| {
//!     let port = scope.bind(parse_port("80"))?;
//!     let port = scope.bind(check_range(port))?;
//!     Ok(port + 1)
//! });
//! assert_eq!(bad, Outcome::Failure("port 80 is privileged".to_string()));
//! ```
//!
//! ## Features
//!
//! - `async` (default): concurrent scopes and tokio integration.
//! - `tracing`: structured events for failures, cancellation and child panics.
//! - `serde`: `Serialize`/`Deserialize` for `Outcome`.
//! - `proptest`: `Arbitrary` for `Outcome`.
//!
//! For runnable programs, see the `demos` directory.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod binding;
pub mod catch;
#[cfg(feature = "async")]
pub mod concurrent;
pub mod iter;
pub mod outcome;
pub mod testing;
pub mod zip;

// Re-exports
pub use binding::{binding, BindingScope, Unwind};
pub use catch::{catching, catching_async, catching_with, Fatal, Panicked};
#[cfg(feature = "async")]
pub use concurrent::{
    concurrent_binding, CancelPolicy, Child, ConcurrentBinding, ConcurrentScope, TaskUnwind,
};
pub use outcome::{IntoOutcome, Outcome};
pub use zip::{zip, zip_async, zip_or_accumulate, zip_or_accumulate_async, ZipFutures, ZipProducers};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::binding::{binding, BindingScope, Unwind};
    pub use crate::catch::{catching, catching_async, Fatal, Panicked};
    #[cfg(feature = "async")]
    pub use crate::concurrent::{
        concurrent_binding, CancelPolicy, ConcurrentBinding, ConcurrentScope, TaskUnwind,
    };
    pub use crate::outcome::{IntoOutcome, Outcome};
    pub use crate::zip::{zip, zip_async, zip_or_accumulate, zip_or_accumulate_async};
}

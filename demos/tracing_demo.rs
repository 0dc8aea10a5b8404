//! Demonstrates tracing integration with concurrent scopes
//!
//! Run with: cargo run --example tracing_demo --features tracing

use std::time::Duration;

use confluence::{ConcurrentBinding, Outcome};

#[tokio::main]
async fn main() {
    // Set up tracing subscriber
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    tracing::info!("Starting tracing demo");

    let result = ConcurrentBinding::new()
        .name("inventory-sync")
        .run(|scope| async move {
            let warehouses: Vec<_> = ["north", "south", "east"]
                .into_iter()
                .enumerate()
                .map(|(i, name)| {
                    scope.spawn_with(move |s| async move {
                        tokio::time::sleep(Duration::from_millis(10 * (i as u64 + 1))).await;
                        let count = if name == "south" {
                            Outcome::failure(format!("{} warehouse offline", name))
                        } else {
                            Outcome::success(100 * (i as u32 + 1))
                        };
                        s.bind(count)
                    })
                })
                .collect();

            let mut total = 0;
            for warehouse in warehouses {
                total += warehouse.await?;
            }
            Ok(total)
        })
        .await;

    match result {
        Outcome::Success(total) => tracing::info!("Synced {} items", total),
        Outcome::Failure(e) => tracing::error!("Sync failed: {}", e),
    }
}

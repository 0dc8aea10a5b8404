//! Checkout example - independent lookups in one concurrent scope
//!
//! Run with: cargo run --example checkout

use std::time::Duration;

use confluence::concurrent::CancelPolicy;
use confluence::{catching_async, concurrent_binding, zip_async, ConcurrentBinding, Outcome};
use tokio::time::{sleep, Instant};

#[derive(Debug, Clone, PartialEq)]
enum CheckoutError {
    CartEmpty,
    PaymentDeclined { reason: String },
    ShippingUnavailable(String),
}

async fn load_cart(user: &str) -> Outcome<Vec<String>, CheckoutError> {
    sleep(Duration::from_millis(30)).await;
    if user == "guest" {
        Outcome::failure(CheckoutError::CartEmpty)
    } else {
        Outcome::success(vec!["kettle".to_string(), "mug".to_string()])
    }
}

async fn quote_shipping(country: &str) -> Outcome<u32, CheckoutError> {
    sleep(Duration::from_millis(80)).await;
    match country {
        "NL" | "DE" => Outcome::success(495),
        other => Outcome::failure(CheckoutError::ShippingUnavailable(other.to_string())),
    }
}

async fn authorize_card(card: &str) -> Result<String, CheckoutError> {
    sleep(Duration::from_millis(120)).await;
    if card.ends_with("0000") {
        Err(CheckoutError::PaymentDeclined {
            reason: "test card".to_string(),
        })
    } else {
        Ok(format!("auth-{}", &card[card.len().saturating_sub(4)..]))
    }
}

async fn checkout(
    user: &'static str,
    country: &'static str,
    card: &'static str,
) -> Outcome<String, CheckoutError> {
    concurrent_binding(|scope| async move {
        let cart = scope.spawn_with(move |s| async move { s.bind(load_cart(user).await) });
        let shipping = scope.spawn_with(move |s| async move { s.bind(quote_shipping(country).await) });
        let auth = scope.spawn_with(move |s| async move { s.bind(authorize_card(card).await) });

        let cart = cart.await?;
        scope.ensure(!cart.is_empty(), || CheckoutError::CartEmpty)?;
        let shipping = shipping.await?;
        let auth = auth.await?;
        Ok(format!(
            "{} items, shipping {} cents, {}",
            cart.len(),
            shipping,
            auth
        ))
    })
    .await
}

#[tokio::main]
async fn main() {
    println!("=== Concurrent scope ===");
    for (user, country, card) in [
        ("ada", "NL", "4111111111111111"),
        ("guest", "NL", "4111111111111111"),
        ("ada", "US", "4111111111111111"),
        ("ada", "DE", "4000000000000000"),
    ] {
        let start = Instant::now();
        let result = checkout(user, country, card).await;
        println!("{:>5} {} -> {:?} ({:?})", user, country, result, start.elapsed());
    }

    println!("\n=== Lazy cancellation ===");
    let start = Instant::now();
    let result = ConcurrentBinding::new()
        .cancel_policy(CancelPolicy::Lazy)
        .name("audit")
        .run(|scope| async move {
            let shipping = scope.spawn_with(|s| async move { s.bind(quote_shipping("US").await) });
            let auth = scope.spawn_with(|s| async move { s.bind(authorize_card("4000000000000000").await) });
            Ok((shipping.await?, auth.await?))
        })
        .await;
    println!("first failure: {:?} after {:?}", result, start.elapsed());

    println!("\n=== zip_async ===");
    let quote = zip_async(
        (load_cart("ada"), quote_shipping("DE")),
        |(cart, shipping)| format!("{} items + {} cents shipping", cart.len(), shipping),
    )
    .await;
    println!("{:?}", quote);

    println!("\n=== Panics stay panics ===");
    let caught = catching_async(async {
        let cart: Vec<String> = Vec::new();
        cart[3].clone()
    })
    .await;
    match caught {
        Outcome::Success(item) => println!("item: {}", item),
        Outcome::Failure(panic) => println!("caught: {}", panic),
    }
}

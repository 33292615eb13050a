//! # Example: publish_cancel
//!
//! Demonstrates the publish-scoped cancellation signal.
//!
//! Shows how to:
//! - Attach a [`CancellationToken`] to a single publish.
//! - Short-circuit the remaining subscribers for that one message.
//! - Observe the failure outcome on the publisher's receipt.
//!
//! ## Run
//! ```bash
//! cargo run --example publish_cancel
//! ```

use channelbus::{Bus, SimpleBus};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
struct Scan {
    image_url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let bus = SimpleBus::new();

    // First subscriber decides the scan is pointless and fires the signal.
    bus.subscribe_fn(
        "triage",
        |scan: Scan, cancel: CancellationToken| async move {
            if scan.image_url.ends_with(".txt") {
                println!("[triage] {} is not an image, cancelling", scan.image_url);
                cancel.cancel();
            }
            Ok(())
        },
    );

    // Second subscriber never runs for the cancelled message.
    bus.subscribe_fn(
        "scanner",
        |scan: Scan, _cancel: CancellationToken| async move {
            println!("[scanner] scanning {}", scan.image_url);
            Ok(())
        },
    );

    let good = bus
        .publish_with(
            Scan {
                image_url: "https://example.org/photo.png".into(),
            },
            CancellationToken::new(),
        )
        .await?;
    println!("photo.png delivered cleanly: {good}");

    let bad = bus
        .publish_with(
            Scan {
                image_url: "https://example.org/readme.txt".into(),
            },
            CancellationToken::new(),
        )
        .await?;
    println!("readme.txt delivered cleanly: {bad}");

    // A token that is already set skips every subscriber.
    let preset = CancellationToken::new();
    preset.cancel();
    let skipped = bus
        .publish_with(
            Scan {
                image_url: "https://example.org/other.png".into(),
            },
            preset,
        )
        .await?;
    println!("pre-cancelled delivered cleanly: {skipped}");

    Ok(())
}

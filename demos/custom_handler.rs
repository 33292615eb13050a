//! # Example: custom_handler
//!
//! Demonstrates implementing the [`Handler`] trait on a named type with its
//! own state, plus how a failing handler shows up on the publisher's side.
//!
//! ## Flow
//! ```text
//! publish(MessageRef) ──► dispatcher ──► WordCounter::handle()   (ok)
//!                                   └──► Flaky::handle()         (fails)
//!                                        receipt resolves Ok(false)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=error cargo run --example custom_handler
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use channelbus::messages::MessageRef;
use channelbus::{Bus, Handler, HandlerError, SimpleBus};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Counts how many message references it has seen.
struct SeenCounter {
    seen: AtomicUsize,
}

#[async_trait]
impl Handler<MessageRef> for SeenCounter {
    async fn handle(
        &self,
        message: MessageRef,
        _cancel: CancellationToken,
    ) -> Result<(), HandlerError> {
        let n = self.seen.fetch_add(1, Ordering::SeqCst) + 1;
        println!(
            "[seen-counter] #{n}: channel={} message={}",
            message.channel_id, message.message_id
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "seen-counter"
    }
}

/// Always fails, to show fault isolation: the counter still runs, the
/// publisher only sees `Ok(false)`.
struct Flaky;

#[async_trait]
impl Handler<MessageRef> for Flaky {
    async fn handle(
        &self,
        _message: MessageRef,
        _cancel: CancellationToken,
    ) -> Result<(), HandlerError> {
        Err(HandlerError::failed("simulated downstream outage"))
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let bus = SimpleBus::new();
    let counter = Arc::new(SeenCounter {
        seen: AtomicUsize::new(0),
    });

    bus.subscribe(Arc::clone(&counter));
    bus.subscribe(Flaky);

    for message_id in 1..=3u64 {
        let ok = bus
            .publish(MessageRef {
                channel_id: 7,
                message_id,
            })
            .await?;
        println!("publish {message_id}: delivered cleanly = {ok}");
    }

    println!(
        "counter saw {} messages despite the flaky handler",
        counter.seen.load(Ordering::SeqCst)
    );
    Ok(())
}

//! # Example: basic_publish
//!
//! Minimal publish/subscribe round trip.
//!
//! Shows how to:
//! - Create a [`SimpleBus`].
//! - Subscribe async and sync closures for a payload type.
//! - Publish and await the delivery outcome.
//!
//! ## Run
//! ```bash
//! cargo run --example basic_publish
//! ```

use channelbus::messages::{MemberAction, MemberUpdate};
use channelbus::{Bus, SimpleBus};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let bus = SimpleBus::new();

    bus.subscribe_fn(
        "welcomer",
        |update: MemberUpdate, _cancel: CancellationToken| async move {
            println!("[welcomer] {} {}", update.username, update.action.as_verb());
            Ok(())
        },
    );

    bus.subscribe_sync("auditor", |update: MemberUpdate| {
        println!(
            "[auditor] guild={} user={} ({})",
            update.guild_id,
            update.user_id,
            update.action.as_verb()
        );
    });

    let ok = bus
        .publish(MemberUpdate {
            user_id: 42,
            guild_id: 1,
            username: "kobayashi".to_string(),
            action: MemberAction::Joined,
        })
        .await?;

    println!("delivered cleanly: {ok}");
    Ok(())
}

//! # Example: dynamic_subscribe
//!
//! Demonstrates subscribing and unsubscribing while traffic flows, plus the
//! built-in [`LogWriter`] handler.
//!
//! ## Flow
//! ```text
//! subscribe(LogWriter for MemberUpdate)
//! publish #1 ──► logged
//! unsubscribe(id)
//! publish #2 ──► nobody (still resolves Ok(true))
//! ```
//!
//! ## Run
//! Requires the `logging` feature to export [`LogWriter`].
//! ```bash
//! cargo run --example dynamic_subscribe --features logging
//! ```

use channelbus::messages::{MemberAction, MemberUpdate};
use channelbus::{Bus, LogWriter, SimpleBus};

fn update(user_id: u64, username: &str, action: MemberAction) -> MemberUpdate {
    MemberUpdate {
        user_id,
        guild_id: 1,
        username: username.to_string(),
        action,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let bus = SimpleBus::new();
    let id = bus.subscribe::<MemberUpdate, _>(LogWriter);

    let ok = bus
        .publish(update(42, "kobayashi", MemberAction::Joined))
        .await?;
    println!("first publish delivered cleanly: {ok}");

    bus.unsubscribe(id);

    // The unsubscribe applies at the next dispatch cycle, before this
    // message is delivered; nothing is printed for it.
    let ok = bus.publish(update(42, "kobayashi", MemberAction::Left)).await?;
    println!("second publish delivered cleanly: {ok} (no subscriber output)");

    Ok(())
}

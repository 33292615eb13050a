//! # channelbus
//!
//! **channelbus** is a small in-process, typed publish/subscribe bus for Rust.
//!
//! It decouples event producers (e.g. gateway callbacks reacting to platform
//! events) from event consumers (independent handler modules) without either
//! side knowing about the other. A single background dispatcher task owns the
//! subscriber list and the message queue, so delivery needs no locks at all.
//!
//! ## Architecture
//! ```text
//! Producers (many):                       Dispatcher (one task):
//!   gateway adapter ──┐
//!   command module  ──┼─ publish ──► [message queue] ──┐
//!   anything else   ──┘  (unbounded)                   │
//!                                                      ▼
//!   subscribe ─────────► [subscribe queue] ──┐   ┌─────────────┐
//!   unsubscribe ───────► [unsubscribe queue]─┼──►│ Dispatcher  │
//!                                            │   │  loop       │
//!                        applied at cycle ◄──┘   └──────┬──────┘
//!                        start, unsubs first            │ snapshot order,
//!                                                       │ one at a time
//!                                            ┌──────────┼──────────┐
//!                                            ▼          ▼          ▼
//!                                        handler 1  handler 2  handler N
//!                                        (type-filtered; faults logged,
//!                                         never propagated)
//! ```
//!
//! ## Delivery contract
//! - **FIFO**: messages are delivered in publish order; all payload types
//!   share one queue, so cross-type order is preserved too.
//! - **Snapshot**: the subscriber list is fixed at the start of each drain
//!   cycle; subscribe/unsubscribe requests enqueued mid-cycle apply at the
//!   next wake-up (unsubscribes before subscribes).
//! - **Sequential**: within one message, subscribers run one at a time in
//!   registration order. A slow handler delays everyone behind it.
//! - **Isolation**: a handler error or panic is logged and marks that one
//!   message's outcome as failed; it never reaches other subscribers, other
//!   messages, or the publisher as an unwind.
//! - **Cancellation**: a per-publish [`CancellationToken`] observed before a
//!   subscriber's turn skips the remaining subscribers for that message and
//!   resolves the publish receipt to `false`.
//!
//! The publisher awaits a [`Receipt`] resolving to `Ok(true)` only when every
//! snapshot subscriber ran cleanly and cancellation never fired.
//!
//! ## Example
//! ```rust
//! use channelbus::{Bus, SimpleBus};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Ping(u32);
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = SimpleBus::new();
//!
//!     let id = bus.subscribe_sync("print", |ping: Ping| {
//!         println!("got {ping:?}");
//!     });
//!
//!     let ok = bus.publish(Ping(1)).await?;
//!     assert!(ok);
//!
//!     bus.unsubscribe(id);
//!     Ok(())
//! }
//! ```
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

mod bus;
mod error;
mod subscribers;

pub mod messages;

// ---- Public re-exports ----

pub use bus::{Bus, Receipt, SimpleBus};
pub use error::{BusError, HandlerError};
pub use subscribers::{Handler, HandlerFn, SubscriptionId};

// Optional: expose a simple built-in logging handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

/// Marker for payload types that can travel over the bus.
///
/// Payloads are value types: the bus stores one shared copy and each
/// type-matching subscriber receives its own clone. Blanket-implemented for
/// every `Clone + Send + Sync + 'static` type; there is nothing to implement
/// by hand.
pub trait Message: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Message for T {}

//! # Publish/subscribe bus contract and the in-process implementation.
//!
//! [`Bus`] is the transport-agnostic contract: publish a typed payload,
//! subscribe a typed handler, unsubscribe by id. [`SimpleBus`] implements it
//! with an in-memory queue drained by one background dispatcher task; a
//! broker-backed transport can implement the same trait with identical
//! method shapes and delivery-order guarantees and remain a drop-in
//! substitute for consumers generic over `B: Bus`.

mod dispatch;
mod simple;

pub use simple::{Receipt, SimpleBus};

use tokio_util::sync::CancellationToken;

use crate::Message;
use crate::subscribers::{Handler, SubscriptionId};

/// Transport-agnostic publish/subscribe contract.
///
/// All operations are fire-and-forget from the caller's point of view:
/// - `publish*` enqueues and returns a [`Receipt`] immediately; awaiting the
///   receipt observes the delivery outcome.
/// - `subscribe` reserves and returns an id immediately; the subscription
///   becomes live at the dispatcher's next cycle, so callers must not assume
///   it applies to messages already in flight.
/// - `unsubscribe` is idempotent; unknown or already-removed ids are a
///   silent no-op.
pub trait Bus: Send + Sync {
    /// Publishes a payload with no cancellation signal attached.
    fn publish<M: Message>(&self, message: M) -> Receipt;

    /// Publishes a payload with a publish-scoped cancellation signal.
    ///
    /// Once `cancel` fires, subscribers whose turn has not yet come are
    /// skipped for this message only and the receipt resolves to `false`.
    /// Subscribers already running are not interrupted by the bus (though
    /// they receive the token and may exit early themselves).
    fn publish_with<M: Message>(&self, message: M, cancel: CancellationToken) -> Receipt;

    /// Registers a typed handler; returns its reserved subscription id.
    fn subscribe<M: Message, H: Handler<M>>(&self, handler: H) -> SubscriptionId;

    /// Removes a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

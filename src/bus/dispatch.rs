//! # The dispatcher loop.
//!
//! One long-lived task owns the authoritative subscription list and is the
//! only code that ever reads or mutates it, so delivery needs no locks. All
//! interaction with the rest of the process goes through three intake
//! queues: message envelopes, subscribe requests, unsubscribe requests.
//!
//! ## Cycle rule
//! The loop sleeps until a message arrives. On wake-up it:
//! 1. applies **all** pending unsubscribe requests, then **all** pending
//!    subscribe requests (unsubs first, so a subscribe-then-unsubscribe pair
//!    enqueued in the same window cannot outlive its unsubscribe);
//! 2. delivers the woken message and keeps draining further queued messages
//!    until the queue is momentarily empty - all against the same
//!    subscription snapshot.
//!
//! Subscription changes enqueued mid-cycle take effect at the next wake-up.
//!
//! ## Fault policy
//! A handler `Err` or panic is logged with the subscription id and marks the
//! current message's outcome as failed; delivery continues with the next
//! subscriber. Nothing raised inside a handler can reach the loop, other
//! subscribers, or other messages.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::subscribers::{Subscription, SubscriptionId};

/// One published message in flight.
///
/// Created by the façade, consumed exactly once by the dispatcher, discarded
/// after its completion sender is resolved.
pub(crate) struct Envelope {
    /// The payload, shared across subscriber invocations.
    pub(crate) payload: Arc<dyn Any + Send + Sync>,
    /// Publish-scoped cancellation signal.
    pub(crate) cancel: CancellationToken,
    /// Resolves the publisher's receipt. Exactly one signal per message.
    pub(crate) done: oneshot::Sender<bool>,
}

/// The single background worker behind a [`SimpleBus`](crate::SimpleBus).
pub(crate) struct Dispatcher {
    messages: mpsc::UnboundedReceiver<Envelope>,
    subscribes: mpsc::UnboundedReceiver<Subscription>,
    unsubscribes: mpsc::UnboundedReceiver<SubscriptionId>,
    subscriptions: Vec<Subscription>,
}

impl Dispatcher {
    pub(crate) fn new(
        messages: mpsc::UnboundedReceiver<Envelope>,
        subscribes: mpsc::UnboundedReceiver<Subscription>,
        unsubscribes: mpsc::UnboundedReceiver<SubscriptionId>,
    ) -> Self {
        Self {
            messages,
            subscribes,
            unsubscribes,
            subscriptions: Vec::new(),
        }
    }

    /// Runs until every façade handle is dropped and the queue is drained.
    pub(crate) async fn run(mut self) {
        while let Some(envelope) = self.messages.recv().await {
            self.apply_subscription_changes();

            self.deliver(envelope).await;
            while let Ok(envelope) = self.messages.try_recv() {
                // Same cycle, same snapshot.
                self.deliver(envelope).await;
            }
        }
        log::debug!("dispatcher exiting: all bus handles dropped");
    }

    /// Drains the subscription intake queues, unsubscribes before subscribes.
    fn apply_subscription_changes(&mut self) {
        while let Ok(id) = self.unsubscribes.try_recv() {
            let before = self.subscriptions.len();
            self.subscriptions.retain(|s| s.id() != id);
            if self.subscriptions.len() == before {
                // Unknown or already removed: silent no-op by contract.
                log::trace!("unsubscribe {id}: no matching subscription");
            } else {
                log::trace!("unsubscribe {id}: removed");
            }
        }
        while let Ok(subscription) = self.subscribes.try_recv() {
            log::trace!(
                "subscribe {} ({}) applied",
                subscription.id(),
                subscription.name()
            );
            self.subscriptions.push(subscription);
        }
    }

    /// Delivers one message to the current snapshot, in registration order.
    async fn deliver(&self, envelope: Envelope) {
        let Envelope {
            payload,
            cancel,
            done,
        } = envelope;

        let mut ok = true;
        for subscription in &self.subscriptions {
            if cancel.is_cancelled() {
                ok = false;
                break;
            }

            let fut = subscription.invoke(Arc::clone(&payload), cancel.clone());
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    log::error!(
                        "handler fault in {} ({}): {err}",
                        subscription.id(),
                        subscription.name()
                    );
                    ok = false;
                }
                Err(panic) => {
                    log::error!(
                        "handler panic in {} ({}): {}",
                        subscription.id(),
                        subscription.name(),
                        panic_message(&*panic)
                    );
                    ok = false;
                }
            }
        }

        // Publisher may have dropped the receipt; that is fine.
        let _ = done.send(ok);
    }
}

/// Best-effort extraction of a panic payload's message.
fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_str() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*payload), "boom");
    }

    #[test]
    fn test_panic_message_string() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("kaput"));
        assert_eq!(panic_message(&*payload), "kaput");
    }

    #[test]
    fn test_panic_message_opaque() {
        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(&*payload), "unknown panic");
    }
}

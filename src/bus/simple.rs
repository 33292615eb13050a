//! # In-process bus façade.
//!
//! [`SimpleBus`] is the public surface producers and consumers hold. It only
//! enqueues work onto the dispatcher's intake queues and never touches the
//! subscription list itself; every call returns immediately. The actual
//! delivery machinery lives in the crate-private `dispatch` module.
//!
//! Handles are cheap to clone (three senders). When the last handle drops,
//! the dispatcher drains whatever is already queued and exits.

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::Message;
use crate::bus::Bus;
use crate::bus::dispatch::{Dispatcher, Envelope};
use crate::error::{BusError, HandlerError};
use crate::subscribers::{Handler, HandlerFn, Subscription, SubscriptionId};

/// Awaitable outcome of one publish call.
///
/// Resolves once the dispatcher has finished delivering this specific
/// message:
///
/// - `Ok(true)` - every snapshot subscriber ran without fault and the
///   cancellation signal never fired before a subscriber's turn.
/// - `Ok(false)` - at least one subscriber faulted, or cancellation was
///   observed before some subscriber's turn. The message may still have
///   reached other subscribers; `false` only means *something* downstream
///   failed.
/// - `Err(BusError::Closed)` - the dispatcher is gone and the message will
///   never be delivered.
///
/// Dropping a receipt is allowed; delivery proceeds regardless.
#[must_use = "a receipt resolves to the delivery outcome; drop it explicitly if you don't care"]
#[derive(Debug)]
pub struct Receipt {
    done: oneshot::Receiver<bool>,
}

impl Future for Receipt {
    type Output = Result<bool, BusError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().done)
            .poll(cx)
            .map_err(|_| BusError::Closed)
    }
}

/// In-process, typed publish/subscribe bus.
///
/// Construction spawns one background dispatcher task that owns the
/// subscription list and delivers every message sequentially; see the
/// [crate docs](crate) for the full delivery contract.
///
/// ### Properties
/// - **Unbounded intake**: publishing never blocks and never applies
///   backpressure.
/// - **Cloneable**: handles share the same dispatcher.
/// - **Runs for the process lifetime**: there is no stop operation; the
///   dispatcher winds down only when every handle is dropped.
#[derive(Clone)]
pub struct SimpleBus {
    messages: mpsc::UnboundedSender<Envelope>,
    subscribes: mpsc::UnboundedSender<Subscription>,
    unsubscribes: mpsc::UnboundedSender<SubscriptionId>,
}

impl SimpleBus {
    /// Creates a bus and spawns its dispatcher onto the ambient runtime.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime context.
    pub fn new() -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (sub_tx, sub_rx) = mpsc::unbounded_channel();
        let (unsub_tx, unsub_rx) = mpsc::unbounded_channel();

        tokio::spawn(Dispatcher::new(msg_rx, sub_rx, unsub_rx).run());

        Self {
            messages: msg_tx,
            subscribes: sub_tx,
            unsubscribes: unsub_tx,
        }
    }

    /// Subscribes an async closure without defining a handler type.
    ///
    /// Shorthand for `subscribe(HandlerFn::new(name, f))`.
    ///
    /// # Example
    /// ```
    /// # use channelbus::{Bus, SimpleBus};
    /// # use tokio_util::sync::CancellationToken;
    /// # #[derive(Clone)] struct Ping;
    /// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    /// # let _guard = rt.enter();
    /// let bus = SimpleBus::new();
    /// let id = bus.subscribe_fn("pinger", |_ping: Ping, _cancel: CancellationToken| async {
    ///     Ok(())
    /// });
    /// bus.unsubscribe(id);
    /// ```
    pub fn subscribe_fn<M, F, Fut>(
        &self,
        name: impl Into<Cow<'static, str>>,
        f: F,
    ) -> SubscriptionId
    where
        M: Message,
        F: Fn(M, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.subscribe(HandlerFn::new(name, f))
    }

    /// Subscribes a synchronous closure.
    ///
    /// The closure is adapted into an async handler that runs it and
    /// completes immediately with `Ok(())`; it cannot observe the
    /// cancellation signal and cannot fail the publish outcome.
    pub fn subscribe_sync<M, F>(&self, name: impl Into<Cow<'static, str>>, f: F) -> SubscriptionId
    where
        M: Message,
        F: Fn(M) + Send + Sync + 'static,
    {
        self.subscribe(HandlerFn::new(
            name,
            move |message: M, _cancel: CancellationToken| {
                f(message);
                std::future::ready(Ok(()))
            },
        ))
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimpleBus {
    fn publish<M: Message>(&self, message: M) -> Receipt {
        self.publish_with(message, CancellationToken::new())
    }

    fn publish_with<M: Message>(&self, message: M, cancel: CancellationToken) -> Receipt {
        let (done_tx, done_rx) = oneshot::channel();
        let envelope = Envelope {
            payload: Arc::new(message),
            cancel,
            done: done_tx,
        };

        // If the dispatcher is gone the envelope (with its completion
        // sender) is dropped right here and the receipt resolves to
        // `BusError::Closed`.
        let _ = self.messages.send(envelope);

        Receipt { done: done_rx }
    }

    fn subscribe<M: Message, H: Handler<M>>(&self, handler: H) -> SubscriptionId {
        let subscription = Subscription::typed::<M, H>(handler);
        let id = subscription.id();
        let _ = self.subscribes.send(subscription);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let _ = self.unsubscribes.send(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use tokio::sync::Semaphore;

    #[derive(Clone, Debug, PartialEq)]
    struct Ping(u32);

    #[derive(Clone, Debug, PartialEq)]
    struct Pong(u32);

    /// Subscribes a handler that appends `(tag, payload)` to a shared trace.
    fn subscribe_tracer(
        bus: &SimpleBus,
        tag: &'static str,
        trace: Arc<Mutex<Vec<(&'static str, u32)>>>,
    ) -> SubscriptionId {
        bus.subscribe_fn(tag, move |ping: Ping, _cancel: CancellationToken| {
            let trace = Arc::clone(&trace);
            async move {
                trace.lock().unwrap().push((tag, ping.0));
                Ok(())
            }
        })
    }

    fn subscribe_counter(bus: &SimpleBus, hits: Arc<AtomicUsize>) -> SubscriptionId {
        bus.subscribe_fn("counter", move |_ping: Ping, _cancel: CancellationToken| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, AtomicOrdering::SeqCst);
                Ok(())
            }
        })
    }

    #[tokio::test]
    async fn test_fifo_order_and_registration_order() {
        let bus = SimpleBus::new();
        let trace = Arc::new(Mutex::new(Vec::new()));
        subscribe_tracer(&bus, "a", Arc::clone(&trace));
        subscribe_tracer(&bus, "b", Arc::clone(&trace));

        for n in 1..=3 {
            assert_eq!(bus.publish(Ping(n)).await.unwrap(), true);
        }

        let got = trace.lock().unwrap().clone();
        assert_eq!(
            got,
            vec![("a", 1), ("b", 1), ("a", 2), ("b", 2), ("a", 3), ("b", 3)]
        );
    }

    #[tokio::test]
    async fn test_failing_subscriber_does_not_block_others() {
        let bus = SimpleBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        subscribe_counter(&bus, Arc::clone(&hits));
        bus.subscribe_fn("thrower", |_ping: Ping, _cancel: CancellationToken| async {
            Err(HandlerError::failed("boom"))
        });

        for n in 1..=3 {
            assert_eq!(bus.publish(Ping(n)).await.unwrap(), false);
        }
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_panicking_subscriber_is_isolated() {
        let bus = SimpleBus::new();
        async fn exploding(_ping: Ping, _cancel: CancellationToken) -> Result<(), HandlerError> {
            panic!("handler exploded")
        }
        bus.subscribe_fn("panicker", exploding);
        let hits = Arc::new(AtomicUsize::new(0));
        subscribe_counter(&bus, Arc::clone(&hits));

        assert_eq!(bus.publish(Ping(1)).await.unwrap(), false);
        assert_eq!(bus.publish(Ping(2)).await.unwrap(), false);
        // The panicker registered first, yet the counter saw every message.
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_snapshot_excludes_midcycle_subscriber() {
        let bus = SimpleBus::new();

        // Gate handler: reports entry, then waits for a permit, proving the
        // cycle is held open while we enqueue more work.
        let (entered_tx, mut entered_rx) = mpsc::unbounded_channel();
        let gate = Arc::new(Semaphore::new(0));
        let gate_for_handler = Arc::clone(&gate);
        bus.subscribe_fn("gate", move |_ping: Ping, _cancel: CancellationToken| {
            let gate = Arc::clone(&gate_for_handler);
            let entered = entered_tx.clone();
            async move {
                let _ = entered.send(());
                gate.acquire().await.map_err(HandlerError::failed)?.forget();
                Ok(())
            }
        });

        let first = bus.publish(Ping(1));
        entered_rx.recv().await.unwrap();
        // Cycle 1 is now in flight with its snapshot taken.

        let second = bus.publish(Ping(2));
        let third = bus.publish(Ping(3));
        let late_hits = Arc::new(AtomicUsize::new(0));
        subscribe_counter(&bus, Arc::clone(&late_hits));

        gate.add_permits(3);
        assert!(first.await.unwrap());
        assert!(second.await.unwrap());
        assert!(third.await.unwrap());
        // All three messages were drained in the cycle that started before
        // the late subscription was applied.
        assert_eq!(late_hits.load(AtomicOrdering::SeqCst), 0);

        gate.add_permits(1);
        assert!(bus.publish(Ping(4)).await.unwrap());
        assert_eq!(late_hits.load(AtomicOrdering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let bus = SimpleBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let doomed = bus.subscribe_fn("doomed", |_ping: Ping, _cancel: CancellationToken| async {
            Err(HandlerError::failed("should never run"))
        });
        subscribe_counter(&bus, Arc::clone(&hits));

        // Id that was issued but never registered on this bus.
        let other_bus = SimpleBus::new();
        let foreign = subscribe_counter(&other_bus, Arc::new(AtomicUsize::new(0)));

        bus.unsubscribe(doomed);
        bus.unsubscribe(doomed);
        bus.unsubscribe(foreign);

        assert_eq!(bus.publish(Ping(1)).await.unwrap(), true);
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_type_filtering_across_one_queue() {
        let bus = SimpleBus::new();
        let pings = Arc::new(AtomicUsize::new(0));
        let pongs = Arc::new(AtomicUsize::new(0));
        subscribe_counter(&bus, Arc::clone(&pings));
        let pongs_for_handler = Arc::clone(&pongs);
        bus.subscribe_fn("pong", move |_pong: Pong, _cancel: CancellationToken| {
            let pongs = Arc::clone(&pongs_for_handler);
            async move {
                pongs.fetch_add(1, AtomicOrdering::SeqCst);
                Ok(())
            }
        });

        assert!(bus.publish(Ping(1)).await.unwrap());
        assert!(bus.publish(Pong(1)).await.unwrap());
        assert!(bus.publish(Ping(2)).await.unwrap());

        assert_eq!(pings.load(AtomicOrdering::SeqCst), 2);
        assert_eq!(pongs.load(AtomicOrdering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_precancelled_publish_invokes_no_one() {
        let bus = SimpleBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        subscribe_counter(&bus, Arc::clone(&hits));

        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(bus.publish_with(Ping(1), cancel).await.unwrap(), false);
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancellation_short_circuits_remaining_subscribers() {
        let bus = SimpleBus::new();
        // First subscriber fires the publish-scoped signal itself.
        bus.subscribe_fn("igniter", |_ping: Ping, cancel: CancellationToken| async move {
            cancel.cancel();
            Ok(())
        });
        let hits = Arc::new(AtomicUsize::new(0));
        subscribe_counter(&bus, Arc::clone(&hits));

        let cancel = CancellationToken::new();
        assert_eq!(bus.publish_with(Ping(1), cancel).await.unwrap(), false);
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_applies_before_next_cycle() {
        let bus = SimpleBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let id = subscribe_counter(&bus, Arc::clone(&hits));

        assert!(bus.publish(Ping(1)).await.unwrap());
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 1);

        bus.unsubscribe(id);
        // Second cycle applies the unsubscribe before delivering.
        assert!(bus.publish(Ping(2)).await.unwrap());
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_publish_with_no_subscribers_resolves_true() {
        let bus = SimpleBus::new();
        assert_eq!(bus.publish(Ping(1)).await.unwrap(), true);
    }

    #[tokio::test]
    async fn test_sync_closure_subscription() {
        let bus = SimpleBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_for_handler = Arc::clone(&hits);
        bus.subscribe_sync("sync-counter", move |_ping: Ping| {
            hits_for_handler.fetch_add(1, AtomicOrdering::SeqCst);
        });

        assert!(bus.publish(Ping(1)).await.unwrap());
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_receipt_errs_when_dispatcher_is_gone() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let bus = {
            let _guard = rt.enter();
            SimpleBus::new()
        };
        // Tearing down the runtime aborts the dispatcher task.
        drop(rt);

        let receipt = bus.publish(Ping(1));
        let probe = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        assert!(matches!(probe.block_on(receipt), Err(BusError::Closed)));
    }
}

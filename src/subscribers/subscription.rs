//! # Subscription records and type erasure.
//!
//! [`Subscription`] pairs a process-unique [`SubscriptionId`] with a
//! type-erased handler the dispatcher can invoke without knowing concrete
//! payload types. The erased handler filters at invocation time: a payload
//! whose runtime type does not match the declared type completes immediately
//! as a no-op, which is what lets subscribers for different message types
//! share one queue and one dispatcher.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::Message;
use crate::error::HandlerError;
use crate::subscribers::Handler;

/// Global counter for subscription ids. Never reused within a process.
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier returned by subscribe, accepted by unsubscribe.
///
/// Ids are process-unique and monotonically increasing; they are never
/// recycled, so a stale id passed to unsubscribe can only ever be a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Future returned by an erased handler invocation.
pub(crate) type ErasedFuture = BoxFuture<'static, Result<(), HandlerError>>;

/// Uniform handler shape the dispatcher works with.
type ErasedHandler =
    Box<dyn Fn(Arc<dyn Any + Send + Sync>, CancellationToken) -> ErasedFuture + Send + Sync>;

/// A registered `(identifier, type-filtered handler)` pair.
///
/// Created by the façade at subscribe time, owned exclusively by the
/// dispatcher loop once applied to its list.
pub(crate) struct Subscription {
    id: SubscriptionId,
    name: String,
    handler: ErasedHandler,
}

impl Subscription {
    /// Erases a typed handler into a [`Subscription`].
    ///
    /// The returned record is bound to a freshly reserved id for the lifetime
    /// of the subscription.
    pub(crate) fn typed<M, H>(handler: H) -> Self
    where
        M: Message,
        H: Handler<M>,
    {
        let handler = Arc::new(handler);
        let name = handler.name().to_owned();
        let erased: ErasedHandler = Box::new(move |payload, cancel| {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                match payload.downcast_ref::<M>() {
                    Some(message) => handler.handle(message.clone(), cancel).await,
                    // Different payload type: not an error, just not ours.
                    None => Ok(()),
                }
            })
        });

        Self {
            id: SubscriptionId::next(),
            name,
            handler: erased,
        }
    }

    pub(crate) fn id(&self) -> SubscriptionId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the erased handler against a shared payload.
    pub(crate) fn invoke(
        &self,
        payload: Arc<dyn Any + Send + Sync>,
        cancel: CancellationToken,
    ) -> ErasedFuture {
        (self.handler)(payload, cancel)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

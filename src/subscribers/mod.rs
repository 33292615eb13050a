//! # Subscriber side of the bus.
//!
//! A subscriber is anything implementing [`Handler`] for some payload type
//! `M`. At subscribe time the typed handler is erased into a uniform
//! `Subscription` record that the dispatcher can invoke without knowing
//! concrete types; the erased wrapper re-checks the payload's runtime type on
//! every invocation and completes as a no-op on mismatch.
//!
//! ```text
//! Handler<M>  ──Subscription::typed()──►  Subscription
//!   (typed)                                 ├─ SubscriptionId (process-unique)
//!                                           └─ erased fn(Arc<dyn Any>, token)
//!                                                 │
//!                                                 ├─ payload is M  → clone, handle()
//!                                                 └─ payload not M → Ok(()) (skip)
//! ```
//!
//! Closures can subscribe without a named type via [`HandlerFn`], or through
//! the convenience methods on [`SimpleBus`](crate::SimpleBus).

mod handler;
mod handler_fn;
mod subscription;

#[cfg(feature = "logging")]
mod log;

pub use handler::Handler;
pub use handler_fn::HandlerFn;
pub use subscription::SubscriptionId;

pub(crate) use subscription::Subscription;

#[cfg(feature = "logging")]
pub use log::LogWriter;

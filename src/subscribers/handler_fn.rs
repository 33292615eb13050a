//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(M, CancellationToken) -> Fut`,
//! producing a fresh future per invocation. This avoids shared mutable state
//! inside the handler; if shared state is needed, capture an `Arc<...>`
//! explicitly in the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use channelbus::{Handler, HandlerFn, HandlerError};
//!
//! #[derive(Clone)]
//! struct Ping(u32);
//!
//! let h = HandlerFn::new("pinger", |ping: Ping, _cancel: CancellationToken| async move {
//!     if ping.0 == 0 {
//!         return Err(HandlerError::failed("zero ping"));
//!     }
//!     Ok(())
//! });
//!
//! assert_eq!(Handler::<Ping>::name(&h), "pinger");
//! ```

use std::borrow::Cow;
use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::Message;
use crate::error::HandlerError;
use crate::subscribers::Handler;

/// Function-backed handler implementation.
///
/// Wraps a closure that *creates* a new future per invocation.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler with the given display name.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<M, F, Fut> Handler<M> for HandlerFn<F>
where
    M: Message,
    F: Fn(M, CancellationToken) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, message: M, cancel: CancellationToken) -> Result<(), HandlerError> {
        (self.f)(message, cancel).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

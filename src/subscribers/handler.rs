//! # Core handler trait
//!
//! `Handler<M>` is the extension point for plugging consumers into the bus.
//! Each handler is invoked by the dispatcher loop, one invocation at a time,
//! for every published payload whose runtime type is `M`.
//!
//! ## Contract
//! - Invocations are **sequential**: the dispatcher awaits each handler
//!   before moving to the next subscriber or the next message. A slow handler
//!   delays everything behind it.
//! - Returning `Err` marks the current message's publish outcome as failed;
//!   it is logged with the subscription id and does not reach other
//!   subscribers.
//! - `cancel` is the publish-scoped signal. It is checked by the dispatcher
//!   before each subscriber's turn; long-running handlers should also check
//!   it themselves and return [`HandlerError::Canceled`] to stop early.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::Message;
use crate::error::HandlerError;

/// Contract for typed bus subscribers.
///
/// Called from the dispatcher task. Implementations should avoid blocking the
/// async runtime (prefer async I/O and cooperative waits).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use channelbus::{Handler, HandlerError};
///
/// #[derive(Clone)]
/// struct MemberJoined { user_id: u64 }
///
/// struct Greeter;
///
/// #[async_trait]
/// impl Handler<MemberJoined> for Greeter {
///     async fn handle(
///         &self,
///         message: MemberJoined,
///         _cancel: CancellationToken,
///     ) -> Result<(), HandlerError> {
///         println!("welcome, user {}", message.user_id);
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "greeter"
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<M: Message>: Send + Sync + 'static {
    /// Handles a single payload of the declared type.
    ///
    /// The payload arrives by value (a clone of the published message), so
    /// handlers never contend over shared payload state.
    async fn handle(&self, message: M, cancel: CancellationToken) -> Result<(), HandlerError>;

    /// Human-readable name (for logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

// Lets callers keep a shared handle to a stateful handler while the bus owns
// its own reference.
#[async_trait]
impl<M: Message, H: Handler<M>> Handler<M> for std::sync::Arc<H> {
    async fn handle(&self, message: M, cancel: CancellationToken) -> Result<(), HandlerError> {
        (**self).handle(message, cancel).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

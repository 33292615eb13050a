//! Error types used by the bus runtime and subscriber handlers.
//!
//! Two error enums with distinct audiences:
//!
//! - [`BusError`] — surfaced to publishers through [`Receipt`](crate::Receipt)
//!   when the bus itself is unusable.
//! - [`HandlerError`] — returned by subscriber handlers to report a failed
//!   invocation; consumed by the dispatcher loop, never propagated past it.
//!
//! Both provide `as_label()` for stable snake_case identifiers in logs.

use thiserror::Error;

/// # Errors produced by the bus runtime.
///
/// These represent failures of the bus machinery itself, not of any
/// individual subscriber.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// The dispatcher loop is gone and the message can no longer be
    /// delivered or resolved.
    ///
    /// In practice this means the runtime that spawned the dispatcher was
    /// shut down while bus handles were still live elsewhere.
    #[error("bus is closed; dispatcher loop has terminated")]
    Closed,
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use channelbus::BusError;
    ///
    /// assert_eq!(BusError::Closed.as_label(), "bus_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::Closed => "bus_closed",
        }
    }
}

/// # Errors produced by subscriber handlers.
///
/// A handler returning `Err` marks the outcome of the message currently being
/// delivered as failed. The dispatcher logs the error with the subscription
/// id and carries on with the remaining subscribers; nothing escapes the
/// invocation site.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler ran and failed with the given message.
    #[error("handler failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// Handler observed the publish-scoped cancellation signal and bailed
    /// out early.
    #[error("handler cancelled")]
    Canceled,
}

impl HandlerError {
    /// Builds a [`HandlerError::Failed`] from anything displayable.
    ///
    /// # Example
    /// ```
    /// use channelbus::HandlerError;
    ///
    /// let err = HandlerError::failed("connection refused");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn failed(error: impl std::fmt::Display) -> Self {
        HandlerError::Failed {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Canceled => "handler_canceled",
        }
    }

    /// Whether this failure came from observing the cancellation signal.
    pub fn is_canceled(&self) -> bool {
        matches!(self, HandlerError::Canceled)
    }
}

//! # Simple logging handler for debugging and demos.
//!
//! [`LogWriter`] prints every payload it receives to stdout in a
//! human-readable format. Subscribe it once per payload type of interest.
//!
//! ## Output format
//! ```text
//! [bus] MemberUpdate { user_id: 42, guild_id: 1, username: "kobayashi", action: Joined }
//! [bus] MessageRef { channel_id: 7, message_id: 1234 }
//! ```

use std::fmt::Debug;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::Message;
use crate::error::HandlerError;
use crate::subscribers::Handler;

/// Simple stdout logging handler.
///
/// Enabled via the `logging` feature. Prints a `Debug` rendering of each
/// received payload for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Handler`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl<M: Message + Debug> Handler<M> for LogWriter {
    async fn handle(&self, message: M, _cancel: CancellationToken) -> Result<(), HandlerError> {
        println!("[bus] {message:?}");
        Ok(())
    }

    fn name(&self) -> &str {
        "log-writer"
    }
}

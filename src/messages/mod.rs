//! # Payload shapes exchanged over the bus.
//!
//! Gateway adapters publish these when a platform event of interest occurs
//! (membership changes, inbound chat messages, deletions, moderation
//! actions); independent handler modules subscribe to the types they care
//! about. The bus itself treats every payload as opaque - nothing here is
//! required, these are simply the shared vocabulary between the producer and
//! consumer modules of the surrounding system, and the traffic the demos and
//! integration tests exercise.
//!
//! All payloads are plain `Clone` value types; each matching subscriber
//! receives its own copy.

/// Membership change direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAction {
    /// User joined the guild.
    Joined,
    /// User left the guild.
    Left,
}

impl MemberAction {
    /// Returns the action as a past-tense verb for display.
    ///
    /// # Example
    /// ```
    /// use channelbus::messages::MemberAction;
    ///
    /// assert_eq!(MemberAction::Joined.as_verb(), "joined");
    /// assert_eq!(MemberAction::Left.as_verb(), "left");
    /// ```
    pub fn as_verb(&self) -> &'static str {
        match self {
            MemberAction::Joined => "joined",
            MemberAction::Left => "left",
        }
    }
}

/// A guild membership change, published by the gateway adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberUpdate {
    /// Platform user id.
    pub user_id: u64,
    /// Guild the change happened in.
    pub guild_id: u64,
    /// Username at the time of the event.
    pub username: String,
    /// Join or leave.
    pub action: MemberAction,
}

/// A lightweight reference to a chat message (inbound or deleted).
///
/// Carries ids only; consumers that need the message body fetch it
/// themselves through their platform client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    /// Channel the message lives in.
    pub channel_id: u64,
    /// The message id.
    pub message_id: u64,
}

/// A moderation audit line destined for a guild's event-log channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLogEntry {
    /// User the entry is about.
    pub user_id: u64,
    /// Guild the entry belongs to.
    pub guild_id: u64,
    /// Username at the time of the event.
    pub username: String,
    /// What happened.
    pub message: String,
    /// What the acting module did about it, if anything.
    pub action_taken: Option<String>,
}

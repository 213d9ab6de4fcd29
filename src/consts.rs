//! Shared constants used across webhook/, front/, ...

/// Channel every accepted webhook is fanned out on.
pub const WEBHOOK_CHANNEL: &str = "webhook";

/// Buffer size for the live-subscriber broadcast channel.
pub const BROADCAST_CAPACITY: usize = 64;

/// Buffer size for in-process state-change notifications.
pub const STATE_CHANGES_CAPACITY: usize = 64;

/// Required signature headers sent by the payments provider.
pub const HEADER_MESSAGE_ID: &str = "message-id";
pub const HEADER_TIMESTAMP: &str = "unix-timestamp";
pub const HEADER_SIGNATURE: &str = "signature";

/// Scheme prefix carried by each signature value.
pub const SIGNATURE_VERSION_PREFIX: &str = "v1,";

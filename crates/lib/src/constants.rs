//! Constants used throughout the Banter library.
//!
//! Storage keys and the default timings of the conversation live here so the
//! library and the terminal front end agree on them.

use std::time::Duration;

/// Key-value slot holding the serialized message history.
pub const HISTORY_KEY: &str = "banter.history";

/// Key-value slot holding the serialized theme selection.
pub const THEME_KEY: &str = "banter.theme";

/// Maximum number of entries retained in the history.
pub const MAX_ENTRIES: usize = 50;

/// Delay between an outbound message and the scripted reply.
pub const REPLY_DELAY: Duration = Duration::from_millis(1500);

/// Idle time after the last draft edit before the typing indicator clears.
pub const TYPING_IDLE: Duration = Duration::from_millis(1000);

/// Label prefix for entries that stand in for an attached file.
pub const ATTACHMENT_PREFIX: &str = "📎 ";

/// Replies the scripted friend picks from.
pub const CANNED_REPLIES: &[&str] = &[
    "That's interesting!",
    "Tell me more.",
    "Haha, nice one 😄",
    "I totally agree.",
    "Hmm, I'm not so sure about that.",
    "Really? No way!",
    "Sounds good to me 👍",
    "Let me think about it...",
];

//! Runtime configuration of a conversation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CANNED_REPLIES, HISTORY_KEY, MAX_ENTRIES, REPLY_DELAY, THEME_KEY, TYPING_IDLE,
};

/// Settings for a [`Conversation`](crate::Conversation).
///
/// Every field has a default, so a partial document deserializes cleanly:
///
/// ```
/// use banter::ChatConfig;
///
/// let config: ChatConfig = serde_json::from_str(r#"{"max_entries": 10}"#).unwrap();
/// assert_eq!(config.max_entries, 10);
/// assert_eq!(config.reply_delay.as_millis(), 1500);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of entries kept before the oldest are evicted.
    pub max_entries: usize,
    /// Delay before the scripted reply arrives.
    #[serde(with = "duration_ms", rename = "reply_delay_ms")]
    pub reply_delay: Duration,
    /// Idle time after the last draft edit before the typing indicator clears.
    #[serde(with = "duration_ms", rename = "typing_idle_ms")]
    pub typing_idle: Duration,
    pub history_key: String,
    pub theme_key: String,
    /// Replies the scripted friend picks from. Empty means the built-in set.
    pub replies: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_entries: MAX_ENTRIES,
            reply_delay: REPLY_DELAY,
            typing_idle: TYPING_IDLE,
            history_key: HISTORY_KEY.to_string(),
            theme_key: THEME_KEY.to_string(),
            replies: Vec::new(),
        }
    }
}

impl ChatConfig {
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn with_typing_idle(mut self, idle: Duration) -> Self {
        self.typing_idle = idle;
        self
    }

    pub fn with_history_key(mut self, key: impl Into<String>) -> Self {
        self.history_key = key.into();
        self
    }

    pub fn with_theme_key(mut self, key: impl Into<String>) -> Self {
        self.theme_key = key.into();
        self
    }

    pub fn with_replies<I, S>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replies = replies.into_iter().map(Into::into).collect();
        self
    }

    /// The replies in effect, falling back to the built-in set.
    pub fn effective_replies(&self) -> Vec<String> {
        if self.replies.is_empty() {
            CANNED_REPLIES.iter().map(|r| r.to_string()).collect()
        } else {
            self.replies.clone()
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

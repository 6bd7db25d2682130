//!
//! Banter: a single-conversation chat widget with a scripted friend.
//! This library provides the core components behind the chat: a bounded, durable
//! message history and the driver that produces delayed canned replies.
//!
//! ## Core Concepts
//!
//! * **Entries (`entry::Entry`)**: One line of chat, either outbound (typed by the user) or
//!   inbound (produced by the scripted friend).
//! * **History (`history::HistoryStore`)**: An ordered, capacity-bounded sequence of entries that is
//!   written through to a key-value slot on every mutation.
//! * **Backends (`backend::KeyValueStore`)**: A pluggable string key-value store used for persistence.
//!     * **InMemory (`backend::InMemory`)**: Keeps everything in process memory.
//!     * **JsonFile (`backend::JsonFile`)**: Persists the whole key space to a JSON file.
//! * **Conversation (`conversation::Conversation`)**: The driver that appends outbound entries,
//!   schedules inbound replies, owns the theme and the typing indicator.
//! * **Debouncer (`debounce::Debouncer`)**: Collapses rapid triggers into one delayed action.

pub mod backend;
pub mod clock;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod debounce;
pub mod entry;
pub mod history;
pub mod reply;
pub mod theme;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "testing"))]
pub use clock::{ClockHold, FixedClock};
pub use config::ChatConfig;
pub use conversation::Conversation;
pub use entry::{Entry, EntryId, FileRef, Sender};
pub use history::HistoryStore;
pub use theme::Theme;

/// Result type used throughout the Banter library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Banter library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured storage errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Backend(_) => "backend",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error is backend-related.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Error::Backend(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Backend(backend_err) => backend_err.is_io_error(),
            _ => false,
        }
    }

    /// Check if this error came from encoding or decoding persisted data.
    pub fn is_serialization_error(&self) -> bool {
        match self {
            Error::Serialize(_) => true,
            Error::Backend(backend_err) => backend_err.is_corruption(),
            _ => false,
        }
    }
}

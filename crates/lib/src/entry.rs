//! Chat entries and their identifiers.
//!
//! An [`Entry`] is one line of the conversation. Entries are identified by an
//! [`EntryId`] generated from a random UUID, so two entries created within the
//! same millisecond still get distinct ids.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::millis_to_datetime;
use crate::constants::ATTACHMENT_PREFIX;

/// Unique identifier of an [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generates a fresh, random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Typed by the local user.
    Outbound,
    /// Produced by the scripted friend.
    Inbound,
}

/// A file picked by the user.
///
/// Only the name is used; the file is never opened. The path is a hint for the
/// current session and is not persisted, since it need not be valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl FileRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }

    /// Builds a reference from a filesystem path, naming it after the final component.
    ///
    /// Returns `None` for paths without a file name (`/`, `..`).
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let name = path.file_name()?.to_string_lossy().into_owned();
        Some(Self {
            name,
            path: Some(path.to_path_buf()),
        })
    }

    /// Text shown in place of the file in the conversation.
    pub fn label(&self) -> String {
        format!("{ATTACHMENT_PREFIX}{}", self.name)
    }
}

/// One line of chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub text: String,
    pub sender: Sender,
    /// Creation time in milliseconds since the Unix epoch. Display only.
    #[serde(default)]
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<FileRef>,
}

impl Entry {
    /// Creates an entry with a freshly generated id.
    pub fn new(sender: Sender, text: impl Into<String>, created_at_ms: u64) -> Self {
        Self {
            id: EntryId::generate(),
            text: text.into(),
            sender,
            created_at_ms,
            attachment: None,
        }
    }

    pub fn outbound(text: impl Into<String>, created_at_ms: u64) -> Self {
        Self::new(Sender::Outbound, text, created_at_ms)
    }

    pub fn inbound(text: impl Into<String>, created_at_ms: u64) -> Self {
        Self::new(Sender::Inbound, text, created_at_ms)
    }

    /// Creates an outbound entry standing in for an attached file.
    pub fn attachment(file: FileRef, created_at_ms: u64) -> Self {
        Self {
            attachment: Some(file.clone()),
            ..Self::outbound(file.label(), created_at_ms)
        }
    }

    pub fn is_outbound(&self) -> bool {
        self.sender == Sender::Outbound
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        millis_to_datetime(self.created_at_ms)
    }
}

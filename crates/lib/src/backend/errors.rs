//! Storage error types for the Banter backends.
//!
//! Structured errors for key-value storage, so callers can tell a missing
//! disk from a corrupt document without matching on strings.

use thiserror::Error;

/// Errors that can occur while reading or writing a key-value backend.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The persisted document carries a format version this build cannot read.
    #[error("Unsupported persistence version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version found in the document
        found: u8,
        /// Version this build writes
        expected: u8,
    },

    /// The store refused a write (quota exceeded, read-only medium, ...).
    #[error("Write to '{key}' rejected: {reason}")]
    WriteRejected {
        /// The key being written
        key: String,
        /// Description of the refusal
        reason: String,
    },
}

impl BackendError {
    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. }
                | BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
        )
    }

    /// Check if this error indicates persisted data that cannot be decoded.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            BackendError::DeserializationFailed { .. } | BackendError::UnsupportedVersion { .. }
        )
    }

    /// Get the key if this error is about a specific slot.
    pub fn key(&self) -> Option<&str> {
        match self {
            BackendError::WriteRejected { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}

//! Color theme selection and its persisted slot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::KeyValueStore;
use crate::Result;

/// The color theme of the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

/// Reads the theme stored under `key`, falling back to the default.
///
/// Missing, unreadable and malformed values all yield [`Theme::default`].
pub async fn load_theme(backend: &dyn KeyValueStore, key: &str) -> Theme {
    let raw = match backend.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key = %key, "No stored theme, using default");
            return Theme::default();
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to read theme, using default");
            return Theme::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(theme) => theme,
        Err(e) => {
            warn!(key = %key, error = %e, "Stored theme is malformed, using default");
            Theme::default()
        }
    }
}

/// Writes `theme` under `key`.
pub async fn save_theme(backend: &dyn KeyValueStore, key: &str, theme: Theme) -> Result<()> {
    let json = serde_json::to_string(&theme)?;
    backend.set(key, json).await
}

//! CLI argument definitions for the Banter binary.

use std::path::PathBuf;
use std::time::Duration;

use banter::ChatConfig;
use banter::constants::{MAX_ENTRIES, REPLY_DELAY, TYPING_IDLE};
use clap::{Parser, ValueEnum};

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// JSON file in the data directory (default, survives restarts)
    Jsonfile,
    /// Process memory only (nothing is kept after exit)
    Inmemory,
}

/// Banter: chat with a scripted friend
#[derive(Parser, Debug)]
#[command(name = "banter")]
#[command(about = "A terminal chat with a scripted friend and durable local history")]
#[command(version)]
pub struct Cli {
    /// Storage backend to use
    #[arg(short, long, default_value = "jsonfile", env = "BANTER_BACKEND")]
    pub backend: Backend,

    /// Data directory holding banter.json
    #[arg(short = 'D', long, env = "BANTER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Number of messages kept in the history
    #[arg(long, default_value_t = MAX_ENTRIES, env = "BANTER_MAX_ENTRIES")]
    pub max_entries: usize,

    /// Delay before the friend replies, in milliseconds
    #[arg(long, default_value_t = REPLY_DELAY.as_millis() as u64, env = "BANTER_REPLY_DELAY_MS")]
    pub reply_delay_ms: u64,

    /// Idle time before the typing indicator clears, in milliseconds
    #[arg(long, default_value_t = TYPING_IDLE.as_millis() as u64, env = "BANTER_TYPING_IDLE_MS")]
    pub typing_idle_ms: u64,

    /// Write logs to this file (the terminal is used by the interface)
    #[arg(long, env = "BANTER_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Data directory, defaulting to the current directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig::default()
            .with_max_entries(self.max_entries)
            .with_reply_delay(Duration::from_millis(self.reply_delay_ms))
            .with_typing_idle(Duration::from_millis(self.typing_idle_ms))
    }
}

//! Reply generation for the scripted friend.

use std::fmt::Debug;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::constants::CANNED_REPLIES;
use crate::entry::Entry;

/// Produces the text of an inbound reply to an outbound entry.
pub trait Responder: Send + Sync + Debug {
    fn reply(&self, prompt: &Entry) -> String;
}

/// Picks a reply uniformly at random from a fixed set, ignoring the prompt.
#[derive(Debug, Clone)]
pub struct CannedResponder {
    replies: Vec<String>,
}

impl CannedResponder {
    /// Creates a responder over `replies`, or over the built-in set if empty.
    pub fn new(replies: Vec<String>) -> Self {
        if replies.is_empty() {
            return Self::default();
        }
        Self { replies }
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    /// Picks a reply using the given random source.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.replies.choose(rng).cloned().unwrap_or_default()
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self {
            replies: CANNED_REPLIES.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl Responder for CannedResponder {
    fn reply(&self, _prompt: &Entry) -> String {
        self.pick(&mut rand::thread_rng())
    }
}

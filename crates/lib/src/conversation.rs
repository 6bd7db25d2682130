//! The conversation driver.
//!
//! A [`Conversation`] owns the message history, the theme selection, the
//! draft being composed and the typing indicator. Sending appends the
//! outbound entry right away and schedules an inbound reply after the
//! configured delay; every send schedules its own reply, and replies never
//! cancel each other.
//!
//! The typing indicator is true while the draft has been edited recently or
//! while any reply is still pending. Draft edits are debounced: only the last
//! edit in a burst arms the timer that clears the indicator.
//!
//! Must be used from within a tokio runtime, since replies and the typing
//! timer are tokio tasks.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, Weak};

use tokio::sync::{Mutex, watch};
use tracing::{debug, trace, warn};

use crate::backend::KeyValueStore;
use crate::clock::{Clock, SystemClock};
use crate::config::ChatConfig;
use crate::debounce::Debouncer;
use crate::entry::{Entry, EntryId, FileRef};
use crate::history::HistoryStore;
use crate::reply::{CannedResponder, Responder};
use crate::theme::{Theme, load_theme, save_theme};

/// State mutated under the async lock, together with its persistence writes.
struct ChatState {
    history: HistoryStore,
    theme: Theme,
}

struct ConversationInner {
    state: Mutex<ChatState>,
    backend: Arc<dyn KeyValueStore>,
    config: ChatConfig,
    responder: Arc<dyn Responder>,
    clock: Arc<dyn Clock>,
    draft: StdMutex<String>,
    typing: watch::Sender<bool>,
    typing_debounce: Debouncer,
    pending_replies: AtomicUsize,
    closed: AtomicBool,
}

impl ConversationInner {
    fn draft_slot(&self) -> MutexGuard<'_, String> {
        self.draft.lock().unwrap_or_else(|p| p.into_inner())
    }

    async fn deliver_reply(&self, prompt: &Entry) {
        if self.closed.load(Ordering::SeqCst) {
            trace!(prompt = %prompt.id, "Conversation closed, dropping reply");
        } else {
            let entry = Entry::inbound(self.responder.reply(prompt), self.clock.now_millis());
            debug!(id = %entry.id, prompt = %prompt.id, "Delivering reply");
            self.state.lock().await.history.append(entry).await;
        }

        let remaining = self.pending_replies.fetch_sub(1, Ordering::SeqCst) - 1;
        if remaining == 0 {
            self.typing.send_replace(false);
        }
    }
}

/// Handle to a conversation. Clones share the same conversation.
///
/// Dropping the last handle cancels the typing timer. Replies still in flight
/// find the conversation gone and do nothing.
#[derive(Clone)]
pub struct Conversation {
    inner: Arc<ConversationInner>,
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("config", &self.inner.config)
            .field("typing", &self.is_typing())
            .field("pending_replies", &self.pending_replies())
            .finish()
    }
}

impl Conversation {
    /// Opens a conversation over `backend` with canned replies and the system clock.
    ///
    /// History and theme are loaded once here; missing or corrupt values fall
    /// back to an empty history and the default theme.
    pub async fn open(backend: Arc<dyn KeyValueStore>, config: ChatConfig) -> Self {
        let responder = Arc::new(CannedResponder::new(config.effective_replies()));
        Self::open_with(backend, config, responder, Arc::new(SystemClock)).await
    }

    /// Opens a conversation with an explicit responder and clock.
    pub async fn open_with(
        backend: Arc<dyn KeyValueStore>,
        config: ChatConfig,
        responder: Arc<dyn Responder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let history = HistoryStore::load(
            Arc::clone(&backend),
            config.history_key.clone(),
            config.max_entries,
        )
        .await;
        let theme = load_theme(backend.as_ref(), &config.theme_key).await;
        debug!(entries = history.len(), %theme, "Opened conversation");

        let (typing, _) = watch::channel(false);
        Self {
            inner: Arc::new(ConversationInner {
                state: Mutex::new(ChatState { history, theme }),
                backend,
                config,
                responder,
                clock,
                draft: StdMutex::new(String::new()),
                typing,
                typing_debounce: Debouncer::new(),
                pending_replies: AtomicUsize::new(0),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.inner.config
    }

    /// Sends a message and schedules the friend's reply.
    ///
    /// Text is trimmed; empty text counts as absent. With both text and a file,
    /// the text entry is appended before the attachment entry and a single reply
    /// is scheduled. The draft is cleared.
    ///
    /// # Returns
    /// `false` if there was nothing to send, in which case nothing changes.
    pub async fn send(&self, text: Option<&str>, file: Option<FileRef>) -> bool {
        let text = text.map(str::trim).filter(|t| !t.is_empty());
        if text.is_none() && file.is_none() {
            trace!("Ignoring empty send");
            return false;
        }

        let now = self.inner.clock.now_millis();
        let mut outgoing = Vec::with_capacity(2);
        if let Some(text) = text {
            outgoing.push(Entry::outbound(text, now));
        }
        if let Some(file) = file {
            outgoing.push(Entry::attachment(file, now));
        }

        let mut prompt = None;
        {
            let mut state = self.inner.state.lock().await;
            for entry in outgoing {
                debug!(id = %entry.id, "Sending entry");
                prompt = Some(entry.clone());
                state.history.append(entry).await;
            }
        }

        self.inner.draft_slot().clear();
        // A pending idle timer must not clear the indicator while the reply is due.
        self.inner.typing_debounce.cancel();
        if let Some(prompt) = prompt {
            self.schedule_reply(prompt);
        }
        true
    }

    /// Sends the current draft, optionally with a file.
    pub async fn send_draft(&self, file: Option<FileRef>) -> bool {
        let draft = self.draft();
        self.send(Some(&draft), file).await
    }

    fn schedule_reply(&self, prompt: Entry) {
        self.inner.pending_replies.fetch_add(1, Ordering::SeqCst);
        self.inner.typing.send_replace(true);

        let weak: Weak<ConversationInner> = Arc::downgrade(&self.inner);
        let delay = self.inner.config.reply_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match weak.upgrade() {
                Some(inner) => inner.deliver_reply(&prompt).await,
                None => trace!(prompt = %prompt.id, "Conversation dropped before reply"),
            }
        });
    }

    /// Deletes the entry with `id`.
    ///
    /// Pending replies and the typing indicator are unaffected.
    ///
    /// # Returns
    /// `true` if an entry was removed.
    pub async fn delete(&self, id: &EntryId) -> bool {
        let mut state = self.inner.state.lock().await;
        let before = state.history.len();
        let after = state.history.remove(id).await.len();
        after < before
    }

    /// Removes every entry from the history.
    pub async fn clear_history(&self) {
        self.inner.state.lock().await.history.clear().await;
    }

    /// Flips the theme between light and dark and persists it.
    pub async fn toggle_theme(&self) -> Theme {
        let mut state = self.inner.state.lock().await;
        let theme = state.theme.toggled();
        self.store_theme(&mut state, theme).await;
        theme
    }

    /// Selects `theme` and persists it.
    pub async fn set_theme(&self, theme: Theme) {
        let mut state = self.inner.state.lock().await;
        self.store_theme(&mut state, theme).await;
    }

    async fn store_theme(&self, state: &mut ChatState, theme: Theme) {
        state.theme = theme;
        if let Err(e) =
            save_theme(self.inner.backend.as_ref(), &self.inner.config.theme_key, theme).await
        {
            warn!(error = %e, %theme, "Failed to persist theme; keeping in-memory state");
        }
    }

    pub async fn theme(&self) -> Theme {
        self.inner.state.lock().await.theme
    }

    /// A snapshot of the history, oldest first.
    pub async fn entries(&self) -> Vec<Entry> {
        self.inner.state.lock().await.history.entries().to_vec()
    }

    /// Replaces the draft. This is the input-composition signal: it raises the
    /// typing indicator and re-arms the idle timer that lowers it.
    pub fn compose(&self, draft: impl Into<String>) {
        *self.inner.draft_slot() = draft.into();
        self.inner.typing.send_replace(true);

        let weak = Arc::downgrade(&self.inner);
        self.inner
            .typing_debounce
            .schedule(self.inner.config.typing_idle, async move {
                if let Some(inner) = weak.upgrade()
                    && inner.pending_replies.load(Ordering::SeqCst) == 0
                {
                    inner.typing.send_replace(false);
                }
            });
    }

    /// Appends an emoji to the draft.
    pub fn insert_emoji(&self, emoji: &str) {
        let next = format!("{}{emoji}", self.draft());
        self.compose(next);
    }

    pub fn draft(&self) -> String {
        self.inner.draft_slot().clone()
    }

    pub fn is_typing(&self) -> bool {
        *self.inner.typing.borrow()
    }

    /// Subscribe to typing indicator changes.
    pub fn typing_updates(&self) -> watch::Receiver<bool> {
        self.inner.typing.subscribe()
    }

    /// Number of replies scheduled but not yet delivered.
    pub fn pending_replies(&self) -> usize {
        self.inner.pending_replies.load(Ordering::SeqCst)
    }

    /// Tears the conversation down.
    ///
    /// Cancels the typing timer. Replies that fire afterwards are discarded.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        if self.inner.typing_debounce.cancel() {
            trace!("Cancelled pending typing timer");
        }
        debug!(pending_replies = self.pending_replies(), "Closed conversation");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

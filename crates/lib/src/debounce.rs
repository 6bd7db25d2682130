//! Debounced deferred actions.
//!
//! A [`Debouncer`] runs at most one pending action at a time. Scheduling a new
//! action aborts the previous one if it has not fired yet, so a burst of
//! triggers collapses into a single action fired `delay` after the last one.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// Owner of a single replaceable deferred action.
///
/// Must be used from within a tokio runtime. Dropping the debouncer cancels
/// whatever is still pending.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        // The guarded value is a plain handle; a poisoned lock leaves it usable.
        self.pending.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Runs `action` after `delay`, cancelling any previously scheduled action.
    pub fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });
        if let Some(previous) = self.slot().replace(handle) {
            if !previous.is_finished() {
                trace!("Replacing pending debounced action");
            }
            previous.abort();
        }
    }

    /// Cancels the pending action.
    ///
    /// # Returns
    /// `true` if an action was pending and has been cancelled.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Whether an action is scheduled and has not completed yet.
    pub fn is_pending(&self) -> bool {
        self.slot().as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.slot().take() {
            handle.abort();
        }
    }
}

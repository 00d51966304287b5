//! # Toast Store
//!
//! Process-wide, ordered list of visible toasts with timed auto-dismissal.
//!
//! Each shown toast gets its own timer task. Dismissing a toast early aborts
//! that task, so a timer never fires against an entry that is already gone.
//! The list itself is guarded by one mutex; on-close callbacks run after the
//! lock is released and may call back into the store.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use super::toast::{OnClose, Toast, ToastId, ToastPhase, ToastVariant, ToastView};
use crate::core::ApiError;

/// Visible toasts at once; showing one more evicts the oldest.
pub const DEFAULT_TOAST_LIMIT: usize = 5;

struct Entry {
    view: ToastView,
    on_close: Option<OnClose>,
    timer: Option<AbortHandle>,
}

impl Entry {
    fn close(mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if let Some(callback) = self.on_close.take() {
            callback(self.view.id);
        }
    }
}

struct State {
    entries: Vec<Entry>,
    limit: usize,
}

/// Notification queue shared by everything that reports request outcomes.
#[derive(Clone)]
pub struct ToastStore {
    state: Arc<Mutex<State>>,
    snapshot: Arc<watch::Sender<Vec<ToastView>>>,
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_LIMIT)
    }
}

impl ToastStore {
    pub fn new(limit: usize) -> Self {
        let (snapshot, _) = watch::channel(Vec::new());
        Self {
            state: Arc::new(Mutex::new(State {
                entries: Vec::new(),
                limit: limit.max(1),
            })),
            snapshot: Arc::new(snapshot),
        }
    }

    /// Show `toast` and schedule its dismissal after `toast.duration`.
    ///
    /// Auto-dismissal needs a Tokio runtime; outside one the toast stays until
    /// dismissed by hand.
    pub fn show(&self, toast: Toast) -> ToastId {
        let id = ToastId::generate();
        let duration = toast.duration;
        let entry = Entry {
            view: ToastView {
                id,
                title: toast.title,
                description: toast.description,
                variant: toast.variant,
                duration,
            },
            on_close: toast.on_close,
            timer: None,
        };

        let evicted: Vec<Entry> = {
            let mut state = self.state.lock();
            state.entries.push(entry);
            let overflow = state.entries.len().saturating_sub(state.limit);
            state.entries.drain(..overflow).collect()
        };

        if let Some(timer) = self.schedule_dismiss(id, duration) {
            let mut state = self.state.lock();
            match state.entries.iter_mut().find(|entry| entry.view.id == id) {
                Some(entry) => entry.timer = Some(timer),
                // Already gone (zero duration, or evicted by a concurrent show)
                None => timer.abort(),
            }
        }

        tracing::debug!(toast_id = %id, duration_ms = duration.as_millis() as u64, "Toast shown");
        for entry in evicted {
            tracing::debug!(toast_id = %entry.view.id, "Toast evicted");
            entry.close();
        }
        self.publish();
        id
    }

    /// Remove a toast and run its on-close callback.
    ///
    /// Returns `false` (and does nothing) if the toast is no longer visible.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let entry = {
            let mut state = self.state.lock();
            match state.entries.iter().position(|entry| entry.view.id == id) {
                Some(index) => state.entries.remove(index),
                None => return false,
            }
        };

        tracing::debug!(toast_id = %id, "Toast dismissed");
        entry.close();
        self.publish();
        true
    }

    /// Dismiss every visible toast, oldest first.
    pub fn dismiss_all(&self) {
        let entries: Vec<Entry> = std::mem::take(&mut self.state.lock().entries);
        if entries.is_empty() {
            return;
        }
        for entry in entries {
            entry.close();
        }
        self.publish();
    }

    /// Replace the title and description of a visible toast.
    pub fn update(&self, id: ToastId, title: impl Into<String>, description: Option<String>) -> bool {
        let updated = {
            let mut state = self.state.lock();
            match state.entries.iter_mut().find(|entry| entry.view.id == id) {
                Some(entry) => {
                    entry.view.title = title.into();
                    entry.view.description = description;
                    true
                }
                None => false,
            }
        };

        if updated {
            self.publish();
        }
        updated
    }

    /// Visible toasts in display (insertion) order.
    pub fn toasts(&self) -> Vec<ToastView> {
        self.state.lock().entries.iter().map(|entry| entry.view.clone()).collect()
    }

    pub fn phase(&self, id: ToastId) -> ToastPhase {
        if self.state.lock().entries.iter().any(|entry| entry.view.id == id) {
            ToastPhase::Visible
        } else {
            ToastPhase::Dismissed
        }
    }

    /// Receive a fresh snapshot every time the visible list changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ToastView>> {
        self.snapshot.subscribe()
    }

    pub fn toast(&self, title: impl Into<String>, description: Option<String>, variant: ToastVariant) -> ToastId {
        let mut toast = Toast::new(title).variant(variant);
        toast.description = description;
        self.show(toast)
    }

    pub fn success(&self, title: impl Into<String>, description: impl Into<String>) -> ToastId {
        self.toast(title, Some(description.into()), ToastVariant::Success)
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) -> ToastId {
        self.toast(title, Some(description.into()), ToastVariant::Destructive)
    }

    pub fn warning(&self, title: impl Into<String>, description: impl Into<String>) -> ToastId {
        self.toast(title, Some(description.into()), ToastVariant::Warning)
    }

    pub fn info(&self, title: impl Into<String>, description: impl Into<String>) -> ToastId {
        self.toast(title, Some(description.into()), ToastVariant::Info)
    }

    /// Surface a failed request to the user.
    pub fn notify_error(&self, error: &ApiError) -> ToastId {
        let (title, description) = match error {
            ApiError::Unauthorized { .. } => ("Session expired", "Please log in again.".to_string()),
            ApiError::Forbidden { message } => ("Access denied", message.clone()),
            ApiError::RequestFailed { message, .. } => ("Request failed", message.clone()),
            ApiError::Network(_) => ("Network error", "Could not reach the server. Check your connection.".to_string()),
            ApiError::Decode(_) | ApiError::InvalidKey => ("Unexpected response", error.to_string()),
        };
        self.error(title, description)
    }

    fn schedule_dismiss(&self, id: ToastId, duration: Duration) -> Option<AbortHandle> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(toast_id = %id, "No Tokio runtime, toast will not auto-dismiss");
            return None;
        };

        let store = self.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            store.dismiss(id);
        });
        Some(task.abort_handle())
    }

    fn publish(&self) {
        let toasts = self.toasts();
        self.snapshot.send_replace(toasts);
    }
}

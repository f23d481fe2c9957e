//! In-memory store of short-lived UI notifications
//!
//! One store is created per running session and handed by reference to
//! whatever needs to enqueue messages. Notifications are kept newest first and
//! each one is removed by its own cancellable expiry timer. All mutations go
//! through [`watch::Sender::send_modify`], so they apply to the latest value.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Severity of a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
    Info,
}

/// A message shown to the user until it expires or is dismissed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub ttl_ms: u64,
}

#[derive(Debug)]
struct Inner {
    default_ttl: Duration,
    next_id: AtomicU64,
    sender: watch::Sender<Vec<Notification>>,
    timers: Mutex<HashMap<u64, CancellationToken>>,
    cancel: CancellationToken,
}

impl Inner {
    fn take_timer(&self, id: u64) -> Option<CancellationToken> {
        self.timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }

    fn remove(&self, id: u64) -> bool {
        self.sender.send_if_modified(|all| {
            let before = all.len();
            all.retain(|n| n.id != id);
            all.len() != before
        })
    }
}

/// Shared handle to the notification store
#[derive(Debug, Clone)]
pub struct NotificationStore {
    inner: Arc<Inner>,
}

impl NotificationStore {
    pub fn new(default_ttl: Duration) -> Self {
        let (sender, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                default_ttl,
                next_id: AtomicU64::new(1),
                sender,
                timers: Mutex::new(HashMap::new()),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Add a notification at the front and schedule its expiry.
    ///
    /// Must be called from within a tokio runtime.
    pub fn push(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        ttl: Option<Duration>,
    ) -> Notification {
        let ttl = ttl.unwrap_or(self.inner.default_ttl);
        let mut notification = Notification {
            id: 0,
            kind,
            message: message.into(),
            ttl_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        };

        // Id allocation happens under the channel lock so ids and order agree.
        self.inner.sender.send_modify(|all| {
            notification.id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
            all.insert(0, notification.clone());
        });

        let id = notification.id;
        let token = {
            let mut timers = self
                .inner
                .timers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            // Checked under the timers lock so shutdown cannot slip in between.
            if self.inner.cancel.is_cancelled() {
                tracing::debug!("Notification {} pushed after shutdown, no expiry", id);
                return notification;
            }
            let token = self.inner.cancel.child_token();
            timers.insert(id, token.clone());
            token
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(ttl) => {
                    inner.take_timer(id);
                    if inner.remove(id) {
                        tracing::debug!("Notification {} expired", id);
                    }
                }
                _ = token.cancelled() => {}
            }
        });

        tracing::debug!("Notification {} pushed ({:?}, ttl {:?})", id, kind, ttl);
        notification
    }

    /// Remove a notification before its expiry. Returns false if it was not live.
    pub fn dismiss(&self, id: u64) -> bool {
        if let Some(token) = self.inner.take_timer(id) {
            token.cancel();
        }
        let removed = self.inner.remove(id);
        if removed {
            tracing::debug!("Notification {} dismissed", id);
        }
        removed
    }

    /// Live notifications, newest first
    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner.sender.borrow().clone()
    }

    /// Receive every change to the live list
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.sender.subscribe()
    }

    /// Stop all pending expiry timers. Live notifications stay as they are, and
    /// later pushes are kept without an expiry.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        tracing::debug!("Notification store shut down");
    }

    #[cfg(test)]
    fn pending_timers(&self) -> usize {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

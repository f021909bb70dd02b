//! Toasts: notifications shown above the list for a few seconds.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::Utc;

use crate::app::events::Notification;

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

/// Most toasts shown at once.
const MAX_TOASTS: usize = 3;

/// A notification on screen. It expires `ttl` after it was raised.
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
}

impl Toast {
    fn is_expired(&self, ttl: Duration) -> bool {
        // A clock step backwards yields a negative age; keep the toast.
        (Utc::now() - self.notification.created_at)
            .to_std()
            .is_ok_and(|age| age > ttl)
    }

    /// Renders the toast as one line.
    pub fn render(&self) -> String {
        let marker = if self.notification.is_error() {
            "[!!]"
        } else {
            "[ok]"
        };
        format!("{} {}", marker, self.notification.message)
    }
}

/// Toasts currently on screen, oldest first.
#[derive(Debug)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    ttl: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl ToastQueue {
    /// Creates a queue whose toasts expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl,
        }
    }

    /// Shows a notification.
    pub fn push(&mut self, notification: Notification) {
        self.toasts.push_back(Toast { notification });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    /// Drops expired toasts and renders the rest, one per line.
    pub fn render(&mut self) -> String {
        let ttl = self.ttl;
        self.toasts.retain(|t| !t.is_expired(ttl));
        self.toasts
            .iter()
            .map(|t| format!("{}\n", t.render()))
            .collect()
    }

    /// Removes every toast.
    pub fn dismiss(&mut self) {
        self.toasts.clear();
    }
}

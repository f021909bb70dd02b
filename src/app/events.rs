//! Notification side channel.
//!
//! Controller operations never fail outward. What the user learns about a
//! failed (or successful) remote call arrives here instead, as a
//! [`Notification`] the view shows as a toast.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A user-visible, non-blocking message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    /// Creates an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    /// Returns whether this is an error.
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Receiving half of the notification channel.
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Sending half of the notification channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Creates a connected notifier/receiver pair.
    pub fn channel() -> (Self, NotificationReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Publishes a notification. Dropped silently if nobody listens.
    pub fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification dropped: receiver closed");
        }
    }

    /// Publishes a success notification.
    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notification::success(message));
    }

    /// Publishes an error notification.
    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notification::error(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_arrive_in_order() {
        let (notifier, mut rx) = Notifier::channel();
        notifier.success("saved");
        notifier.error("failed");

        let first = rx.try_recv().unwrap();
        assert_eq!(first.level, NotificationLevel::Success);
        assert_eq!(first.message, "saved");

        let second = rx.try_recv().unwrap();
        assert!(second.is_error());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn notify_without_receiver_is_harmless() {
        let (notifier, rx) = Notifier::channel();
        drop(rx);
        notifier.error("nobody hears this");
    }
}

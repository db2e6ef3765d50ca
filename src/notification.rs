//! User-visible error notifications.
//!
//! The orchestrator calls a [`NotificationSink`] at most once per failed
//! call. Rendering (toasts, banners) belongs to the application.

use tokio::sync::mpsc;

/// Fire-and-forget receiver of user-facing messages.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes messages to the log. Default when no UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(message = %message, "User notification");
    }
}

/// Forwards messages to a channel drained by a UI task.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    /// Create the notifier and the receiver the UI task reads from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelNotifier {
    fn notify(&self, message: &str) {
        if self.tx.send(message.to_string()).is_err() {
            tracing::debug!(message = %message, "Notification dropped; receiver closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify("system down");
        assert_eq!(rx.try_recv().unwrap(), "system down");

        drop(rx);
        // Closed receiver must not panic.
        notifier.notify("ignored");
    }
}

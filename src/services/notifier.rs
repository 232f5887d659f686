//! User notification seam.
//!
//! The host turns notifications into `chrome.notifications` calls; inside the
//! crate they are only produced, never displayed.

use tokio::sync::mpsc;

use crate::types::notification::Notification;

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Forwards notifications to the host writer task.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::warn!("Notification channel closed, dropping notification");
        }
    }
}

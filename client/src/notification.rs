//! The single user-visible error channel of a search session.

use tokio::sync::mpsc;

use crate::error::ClientError;

/// Where a reported error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSource {
    KeyHints,
    SearchResults,
    MoreLikeThis,
    TopArticles,
    Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub source: NotificationSource,
    pub message: String,
}

/// Cloneable handle that turns errors into [`Notification`]s.
///
/// Reporting never fails: once the receiving side is gone notifications are
/// only logged.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn report(&self, source: NotificationSource, err: &ClientError) {
        tracing::warn!(?source, error = %err, "reporting error");
        let notification = Notification { source, message: err.user_message() };
        if self.sender.send(notification).is_err() {
            tracing::debug!(?source, "notification receiver dropped");
        }
    }
}

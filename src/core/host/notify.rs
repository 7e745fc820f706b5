//! Notification channel back to the table.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Who may see a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Audience {
    /// Broadcast to everyone at the table.
    All,
    /// Whispered to the privileged role of the player who issued the command.
    Private { requester: String },
}

impl Audience {
    pub fn private(requester: impl Into<String>) -> Self {
        Self::Private {
            requester: requester.into(),
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private { .. })
    }
}

/// A single chat-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub audience: Audience,
    pub sender: String,
    pub text: String,
}

impl Notification {
    /// Render in the host's chat syntax, whispering private messages to the GM.
    pub fn to_chat_line(&self) -> String {
        match self.audience {
            Audience::All => format!("{}: {}", self.sender, self.text),
            Audience::Private { .. } => format!("{}: /w gm {}", self.sender, self.text),
        }
    }
}

/// Outbound chat transport.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Collects notifications in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[Notification] {
        &self.sent
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.sent.last()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.sent.push(notification);
    }
}

/// Writes each notification as one chat line.
pub struct WriterNotifier<W: Write> {
    out: W,
}

impl<W: Write> WriterNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for WriterNotifier<W> {
    fn notify(&mut self, notification: Notification) {
        if let Err(e) = writeln!(self.out, "{}", notification.to_chat_line()) {
            warn!(error = %e, "failed to write notification");
        }
    }
}

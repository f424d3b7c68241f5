//! services/dashboard/src/adapters/notifier.rs
//!
//! Adapters for the `Notifier` port: one that only writes to the log, and one
//! that forwards notices over a channel so a UI loop can show them as toasts.

use rehab_schedule_core::ports::{Notice, NoticeLevel, Notifier};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Writes every notice to the `tracing` log.
#[derive(Clone, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!(notice = %notice.message, "notice"),
            NoticeLevel::Error => warn!(notice = %notice.message, "notice"),
        }
    }
}

/// Forwards notices to an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Creates the notifier together with the receiving end the UI drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        // A closed receiver means the view is gone; the notice has nowhere to go.
        if let Err(mpsc::error::SendError(notice)) = self.sender.send(notice) {
            warn!(notice = %notice.message, "notice dropped, receiver closed");
        }
    }
}

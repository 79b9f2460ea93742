//! Event channel between settlement and the notification pipeline.
//!
//! Events carry identifiers only; the consumer re-reads current state
//! from the ledger, so a stale or replayed event is harmless.

use tokio::sync::mpsc;

/// Default buffer size for event channels.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Events consumed by the notification sender.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    /// An order transitioned to `paid`; the completion notice should go
    /// out.
    OrderPaid { trade_no: String },
}

/// Sender handle for notification events.
pub type NotificationEventSender = mpsc::Sender<NotificationEvent>;
/// Receiver handle for notification events.
pub type NotificationEventReceiver = mpsc::Receiver<NotificationEvent>;

/// Create the notification event channel.
pub fn notification_event_channel() -> (NotificationEventSender, NotificationEventReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

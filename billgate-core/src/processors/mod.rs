//! Long-running workers.
//!
//! - `NotificationSender`: receives `NotificationEvent`, passes the
//!   order-paid gate, delivers the completion notice.
//! - `ReminderWorker`: periodic sweep over reminder candidates; the gate
//!   deduplicates across concurrent sweeps.

pub mod notification_sender;
pub mod reminder_worker;

pub use notification_sender::NotificationSender;
pub use reminder_worker::ReminderWorker;

//! NotificationSender processor.
//!
//! Consumes `NotificationEvent`s from settlement, re-reads the order,
//! passes the order-paid gate, hands the message to the notifier, and
//! records the `notified` state in the ledger. Processing is idempotent
//! end to end: a replayed event short-circuits on the order state, and a
//! concurrent duplicate loses the gate.

use crate::entities::OrderStatus;
use crate::events::{NotificationEvent, NotificationEventReceiver};
use crate::gate::{GateError, GateKey, NotificationGate, ReminderKind};
use crate::ledger::{LedgerError, OrderLedger};
use crate::notifier::{Notifier, NotifyError};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Gate window for the order-paid notice. The `notified` ledger state
/// keeps the suppression permanent once the window lapses.
const ORDER_PAID_WINDOW: Duration = Duration::from_secs(24 * 3600);

/// Errors while delivering a completion notice.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("order not found: {0}")]
    OrderNotFound(String),
}

/// Delivers order-completion notices exactly once.
pub struct NotificationSender {
    ledger: Arc<dyn OrderLedger>,
    gate: NotificationGate,
    notifier: Arc<dyn Notifier>,
    event_rx: NotificationEventReceiver,
    shutdown_rx: watch::Receiver<bool>,
}

impl NotificationSender {
    pub fn new(
        ledger: Arc<dyn OrderLedger>,
        gate: NotificationGate,
        notifier: Arc<dyn Notifier>,
        event_rx: NotificationEventReceiver,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            ledger,
            gate,
            notifier,
            event_rx,
            shutdown_rx,
        }
    }

    /// Run until shutdown or channel close.
    pub async fn run(mut self) {
        info!("NotificationSender started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("NotificationSender received shutdown signal");
                        break;
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    if let Err(e) = self.process_event(event).await {
                        error!(error = %e, "failed to process notification event");
                    }
                }

                else => {
                    info!("notification event channel closed");
                    break;
                }
            }
        }

        info!("NotificationSender shutdown complete");
    }

    async fn process_event(&self, event: NotificationEvent) -> Result<(), NotificationError> {
        match event {
            NotificationEvent::OrderPaid { trade_no } => self.send_order_paid(&trade_no).await,
        }
    }

    /// Deliver the completion notice for one paid order.
    pub async fn send_order_paid(&self, trade_no: &str) -> Result<(), NotificationError> {
        let Some(order) = self.ledger.find_by_trade_no(trade_no).await? else {
            return Err(NotificationError::OrderNotFound(trade_no.to_string()));
        };

        if order.status == OrderStatus::Notified {
            debug!(order = %trade_no, "completion notice already sent");
            return Ok(());
        }

        let key = GateKey::new(trade_no, ReminderKind::OrderPaid);
        if !self.gate.try_fire(&key, ORDER_PAID_WINDOW).await? {
            debug!(order = %trade_no, "order-paid gate already held");
            return Ok(());
        }

        let amount = Decimal::new(order.total_amount, 2);
        let message = format!("Your order {trade_no} has been completed. Amount: {amount}.");
        self.notifier.notify_user(order.user_id, &message).await?;

        if self.ledger.mark_notified(trade_no).await? {
            info!(order = %trade_no, user = order.user_id, "completion notice sent");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::Order;
    use crate::events::notification_event_channel;
    use crate::gate::MemoryGateStore;
    use crate::ledger::MemoryOrderLedger;
    use crate::notifier::test_support::RecordingNotifier;
    use uuid::Uuid;

    fn paid_order(trade_no: &str) -> Order {
        Order {
            id: Uuid::new_v4(),
            trade_no: trade_no.to_string(),
            user_id: 7,
            total_amount: 1999,
            status: OrderStatus::Paid,
            callback_no: Some("T9000".to_string()),
            created_at: time::OffsetDateTime::now_utc(),
            paid_at: Some(time::OffsetDateTime::now_utc()),
        }
    }

    fn sender(
        ledger: Arc<MemoryOrderLedger>,
        notifier: Arc<RecordingNotifier>,
    ) -> NotificationSender {
        let (_tx, rx) = notification_event_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        NotificationSender::new(
            ledger,
            NotificationGate::new(Arc::new(MemoryGateStore::new())),
            notifier,
            rx,
            shutdown_rx,
        )
    }

    #[tokio::test]
    async fn notice_goes_out_once_and_marks_notified() {
        let ledger = Arc::new(MemoryOrderLedger::new());
        ledger.insert(paid_order("A1")).await;
        let notifier = Arc::new(RecordingNotifier::default());
        let sender = sender(ledger.clone(), notifier.clone());

        sender.send_order_paid("A1").await.unwrap();
        sender.send_order_paid("A1").await.unwrap();

        let messages = notifier.messages.lock().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, 7);
        assert!(messages[0].1.contains("A1"));
        assert!(messages[0].1.contains("19.99"));

        let order = ledger.find_by_trade_no("A1").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Notified);
    }

    #[tokio::test]
    async fn already_notified_order_is_skipped_without_gating() {
        let ledger = Arc::new(MemoryOrderLedger::new());
        let mut order = paid_order("A1");
        order.status = OrderStatus::Notified;
        ledger.insert(order).await;
        let notifier = Arc::new(RecordingNotifier::default());
        let sender = sender(ledger, notifier.clone());

        sender.send_order_paid("A1").await.unwrap();
        assert!(notifier.messages.lock().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_order_is_an_error() {
        let ledger = Arc::new(MemoryOrderLedger::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let sender = sender(ledger, notifier);

        let err = sender.send_order_paid("missing").await.unwrap_err();
        assert!(matches!(err, NotificationError::OrderNotFound(t) if t == "missing"));
    }

    #[tokio::test]
    async fn run_drains_events_until_shutdown() {
        let ledger = Arc::new(MemoryOrderLedger::new());
        ledger.insert(paid_order("A1")).await;
        let notifier = Arc::new(RecordingNotifier::default());

        let (tx, rx) = notification_event_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sender = NotificationSender::new(
            ledger,
            NotificationGate::new(Arc::new(MemoryGateStore::new())),
            notifier.clone(),
            rx,
            shutdown_rx,
        );
        let handle = tokio::spawn(sender.run());

        tx.send(NotificationEvent::OrderPaid {
            trade_no: "A1".to_string(),
        })
        .await
        .unwrap();

        // Give the loop a moment to drain, then stop it.
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(notifier.messages.lock().await.len(), 1);
    }
}

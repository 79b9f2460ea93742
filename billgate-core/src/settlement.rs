//! Order state machine driven by verified gateway callbacks.

use crate::entities::OrderStatus;
use crate::events::{NotificationEvent, NotificationEventSender};
use crate::ledger::{LedgerError, OrderLedger};
use billgate_gateway::callback::OrderOutcome;
use std::sync::Arc;

/// Result of applying a paid outcome to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTransition {
    pub trade_no: String,
    /// True when an earlier delivery already settled the order; this
    /// call performed no side effects.
    pub already_processed: bool,
}

/// Ledger-consistency failures while settling a callback.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// No order with the given trade number exists. Orders are never
    /// fabricated from callbacks.
    #[error("order {0} not found")]
    NotFound(String),
    /// The order cannot accept payment from its current state.
    #[error("order {trade_no} cannot accept payment from state {status:?}")]
    InvalidState {
        trade_no: String,
        status: OrderStatus,
    },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Applies verified payment outcomes to orders.
pub struct SettlementService {
    ledger: Arc<dyn OrderLedger>,
    notifications: NotificationEventSender,
}

impl SettlementService {
    pub fn new(ledger: Arc<dyn OrderLedger>, notifications: NotificationEventSender) -> Self {
        Self {
            ledger,
            notifications,
        }
    }

    /// Settle a verified callback outcome.
    ///
    /// Safe to call any number of times for the same outcome: exactly one
    /// call performs the `pending -> paid` transition and emits the
    /// notification event; replays and concurrent racers observe
    /// `already_processed`.
    pub async fn apply_paid_outcome(
        &self,
        outcome: &OrderOutcome,
    ) -> Result<OrderTransition, OrderError> {
        let Some(order) = self.ledger.find_by_trade_no(&outcome.trade_no).await? else {
            return Err(OrderError::NotFound(outcome.trade_no.clone()));
        };

        if order.status.is_settled() {
            return Ok(OrderTransition {
                trade_no: outcome.trade_no.clone(),
                already_processed: true,
            });
        }
        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidState {
                trade_no: outcome.trade_no.clone(),
                status: order.status,
            });
        }

        if !self
            .ledger
            .mark_paid(&outcome.trade_no, &outcome.callback_no)
            .await?
        {
            // Lost the race to a concurrent delivery. Confirm the winner
            // actually settled the order rather than it having failed
            // underneath us.
            let current = self
                .ledger
                .find_by_trade_no(&outcome.trade_no)
                .await?
                .ok_or_else(|| OrderError::NotFound(outcome.trade_no.clone()))?;
            if current.status.is_settled() {
                return Ok(OrderTransition {
                    trade_no: outcome.trade_no.clone(),
                    already_processed: true,
                });
            }
            return Err(OrderError::InvalidState {
                trade_no: outcome.trade_no.clone(),
                status: current.status,
            });
        }

        tracing::info!(
            order = %outcome.trade_no,
            callback = %outcome.callback_no,
            "order settled"
        );

        let event = NotificationEvent::OrderPaid {
            trade_no: outcome.trade_no.clone(),
        };
        if let Err(e) = self.notifications.send(event).await {
            // Settlement is durable either way; the notice can only be
            // re-driven by a fresh event, so this must be visible.
            tracing::error!(
                order = %outcome.trade_no,
                error = %e,
                "failed to enqueue order-paid notification"
            );
        }

        Ok(OrderTransition {
            trade_no: outcome.trade_no.clone(),
            already_processed: false,
        })
    }
}

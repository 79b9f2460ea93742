//! Order ledger collaborator boundary.

use crate::entities::{Order, OrderStatus};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Errors surfaced by ledger implementations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence boundary for orders.
///
/// `mark_paid` must be a compare-and-set: the transition happens only if
/// the order is still `pending`, and the return value says whether this
/// caller performed it. That single guarantee is what makes callback
/// settlement safe under concurrent duplicate deliveries.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    async fn find_by_trade_no(&self, trade_no: &str) -> Result<Option<Order>, LedgerError>;

    /// Transition `pending -> paid`, recording the gateway transaction
    /// id. Returns true iff this call performed the transition.
    async fn mark_paid(&self, trade_no: &str, callback_no: &str) -> Result<bool, LedgerError>;

    /// Transition `paid -> notified`. Returns true iff this call
    /// performed the transition.
    async fn mark_notified(&self, trade_no: &str) -> Result<bool, LedgerError>;
}

// ---------------------------------------------------------------------------
// Postgres implementation
// ---------------------------------------------------------------------------

/// Postgres-backed order ledger.
#[derive(Clone)]
pub struct PgOrderLedger {
    pool: PgPool,
}

impl PgOrderLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderLedger for PgOrderLedger {
    async fn find_by_trade_no(&self, trade_no: &str) -> Result<Option<Order>, LedgerError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, trade_no, user_id, total_amount, status, callback_no, created_at, paid_at
            FROM orders
            WHERE trade_no = $1
            "#,
        )
        .bind(trade_no)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    async fn mark_paid(&self, trade_no: &str, callback_no: &str) -> Result<bool, LedgerError> {
        // The status predicate is the compare half of the CAS; the row
        // count says whether this caller won.
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'paid', callback_no = $2, paid_at = now()
            WHERE trade_no = $1 AND status = 'pending'
            "#,
        )
        .bind(trade_no)
        .bind(callback_no)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn mark_notified(&self, trade_no: &str) -> Result<bool, LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'notified'
            WHERE trade_no = $1 AND status = 'paid'
            "#,
        )
        .bind(trade_no)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// In-memory ledger with the same CAS semantics, for tests and embedding.
#[derive(Default)]
pub struct MemoryOrderLedger {
    orders: Mutex<HashMap<String, Order>>,
}

impl MemoryOrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order: Order) {
        self.orders.lock().await.insert(order.trade_no.clone(), order);
    }
}

#[async_trait]
impl OrderLedger for MemoryOrderLedger {
    async fn find_by_trade_no(&self, trade_no: &str) -> Result<Option<Order>, LedgerError> {
        Ok(self.orders.lock().await.get(trade_no).cloned())
    }

    async fn mark_paid(&self, trade_no: &str, callback_no: &str) -> Result<bool, LedgerError> {
        let mut orders = self.orders.lock().await;
        match orders.get_mut(trade_no) {
            Some(order) if order.status == OrderStatus::Pending => {
                order.status = OrderStatus::Paid;
                order.callback_no = Some(callback_no.to_string());
                order.paid_at = Some(time::OffsetDateTime::now_utc());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_notified(&self, trade_no: &str) -> Result<bool, LedgerError> {
        let mut orders = self.orders.lock().await;
        match orders.get_mut(trade_no) {
            Some(order) if order.status == OrderStatus::Paid => {
                order.status = OrderStatus::Notified;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn pending_order(trade_no: &str) -> Order {
        Order {
            id: Uuid::new_v4(),
            trade_no: trade_no.to_string(),
            user_id: 7,
            total_amount: 1999,
            status: OrderStatus::Pending,
            callback_no: None,
            created_at: time::OffsetDateTime::now_utc(),
            paid_at: None,
        }
    }

    #[tokio::test]
    async fn mark_paid_wins_once() {
        let ledger = MemoryOrderLedger::new();
        ledger.insert(pending_order("A1")).await;

        assert!(ledger.mark_paid("A1", "T1").await.unwrap());
        assert!(!ledger.mark_paid("A1", "T2").await.unwrap());

        let order = ledger.find_by_trade_no("A1").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        // The losing call must not overwrite the recorded callback id.
        assert_eq!(order.callback_no.as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn mark_notified_requires_paid() {
        let ledger = MemoryOrderLedger::new();
        ledger.insert(pending_order("A1")).await;

        assert!(!ledger.mark_notified("A1").await.unwrap());
        ledger.mark_paid("A1", "T1").await.unwrap();
        assert!(ledger.mark_notified("A1").await.unwrap());
        assert!(!ledger.mark_notified("A1").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_order_is_none() {
        let ledger = MemoryOrderLedger::new();
        assert!(ledger.find_by_trade_no("missing").await.unwrap().is_none());
    }
}

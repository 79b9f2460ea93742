use uuid::Uuid;

/// A billing order row as persisted by the panel.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    /// Panel-side order number; the key the gateway echoes back.
    pub trade_no: String,
    pub user_id: i64,
    /// Amount in minor currency units.
    pub total_amount: i64,
    pub status: OrderStatus,
    /// Gateway transaction id, recorded when the order was paid.
    pub callback_no: Option<String>,
    pub created_at: time::OffsetDateTime,
    pub paid_at: Option<time::OffsetDateTime>,
}

/// Order lifecycle: `pending -> paid -> notified`, or `pending -> failed`.
///
/// `paid` and `notified` both mean money moved; `notified` additionally
/// records that the completion notice went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Notified,
    Failed,
}

impl OrderStatus {
    /// Whether payment has already been credited.
    pub fn is_settled(self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Notified)
    }
}

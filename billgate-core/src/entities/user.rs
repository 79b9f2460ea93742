/// A panel user as seen by the reminder pipeline.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub telegram_id: Option<i64>,
    /// Upload bytes consumed in the current cycle.
    pub upload_used: i64,
    /// Download bytes consumed in the current cycle.
    pub download_used: i64,
    /// Transfer quota in bytes for the current cycle.
    pub transfer_quota: i64,
    pub expired_at: Option<time::OffsetDateTime>,
    pub remind_traffic: bool,
    pub remind_expire: bool,
}

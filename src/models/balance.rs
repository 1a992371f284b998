use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for account_balances. At most one per user; the
/// `base_balance` is user-entered capital, exclusive of trading results.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountBalance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub base_balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

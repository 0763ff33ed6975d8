//! Settlement transaction model.
//!
//! Transactions are append-only: created at lend time (fee) or fine
//! settlement time, deleted only as an administrative correction, never
//! mutated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::PaymentMethod;

/// Transaction model from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i32,
    pub admin_id: i32,
    pub member_id: i32,
    pub amount: Decimal,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

/// Transaction joined with the member name for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TransactionDetails {
    pub id: i32,
    pub member_id: i32,
    pub member_name: String,
    pub amount: Decimal,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

/// Standalone settlement payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordTransaction {
    pub member_id: i32,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
}

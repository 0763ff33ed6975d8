//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::Category;

/// Book model from the database.
///
/// `status` holds the string code of [`super::enums::BookStatus`]; it is
/// recomputed by every write that touches `quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    #[serde(skip_serializing)]
    pub admin_id: i32,
    pub title: String,
    pub author: String,
    pub category: String,
    pub quantity: i32,
    pub borrowing_fee: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub author: String,
    pub category: Category,
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub borrowing_fee: Decimal,
}

/// Update book payload; same field set as creation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub author: String,
    pub category: Category,
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub borrowing_fee: Decimal,
}

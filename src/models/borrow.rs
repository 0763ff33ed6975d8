//! Borrow record (lending ledger entry) model and lifecycle

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::PaymentMethod;

/// Lifecycle state of a borrow record. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorrowState {
    Active,
    Overdue,
    Returned,
}

/// Borrow record from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BorrowedBook {
    pub id: i32,
    pub admin_id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub return_date: NaiveDate,
    pub fine: Decimal,
    pub returned: bool,
    pub created_at: DateTime<Utc>,
}

impl BorrowedBook {
    /// Overdue = not returned and past its return date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.returned && self.return_date < today
    }

    pub fn state(&self, today: NaiveDate) -> BorrowState {
        if self.returned {
            BorrowState::Returned
        } else if self.return_date < today {
            BorrowState::Overdue
        } else {
            BorrowState::Active
        }
    }
}

/// Borrow record joined with member and book info for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowedBookDetails {
    pub id: i32,
    pub member_id: i32,
    pub member_name: String,
    pub book_id: i32,
    pub book_title: String,
    pub book_author: String,
    pub return_date: NaiveDate,
    pub fine: Decimal,
    pub returned: bool,
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
}

/// Lend request: one member, one or more books, a shared return date and a
/// per-copy fine value fixed at issue time
#[derive(Debug, Clone)]
pub struct LendRequest {
    pub member_id: i32,
    pub book_ids: Vec<i32>,
    pub return_date: NaiveDate,
    pub fine: Decimal,
    pub payment_method: PaymentMethod,
}

/// Outcome of a committed lend
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LendReceipt {
    pub borrowed_ids: Vec<i32>,
    pub amount: Decimal,
    pub transaction_id: i32,
}

/// Update payload for an outstanding borrow record
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBorrowedBook {
    pub return_date: NaiveDate,
    pub fine: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(return_date: NaiveDate, returned: bool) -> BorrowedBook {
        BorrowedBook {
            id: 1,
            admin_id: 1,
            member_id: 1,
            book_id: 1,
            return_date,
            fine: Decimal::from(25),
            returned,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn record_due_today_is_still_active() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let rec = record(today, false);
        assert_eq!(rec.state(today), BorrowState::Active);
        assert!(!rec.is_overdue(today));
    }

    #[test]
    fn record_past_due_is_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let rec = record(yesterday, false);
        assert_eq!(rec.state(today), BorrowState::Overdue);
        assert!(rec.is_overdue(today));
    }

    #[test]
    fn returned_is_terminal_even_when_past_due() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let rec = record(yesterday, true);
        assert_eq!(rec.state(today), BorrowState::Returned);
        assert!(!rec.is_overdue(today));
    }
}

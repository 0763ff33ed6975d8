//! Settlement transactions repository.
//!
//! Lend and fine-settlement rows are written by the ledger repository inside
//! its own transactions; this repository covers standalone recording,
//! listing, administrative deletion and the money aggregates.

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        librarian::AdminId,
        payment::{RecordTransaction, TransactionDetails},
    },
};

const TRANSACTION_DETAILS: &str = r#"
    SELECT t.id, t.member_id, m.name AS member_name,
           t.amount, t.payment_method, t.created_at
    FROM transactions t
    JOIN members m ON t.member_id = m.id
"#;

#[derive(Clone)]
pub struct PaymentsRepository {
    pool: Pool<Postgres>,
}

impl PaymentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get transaction by ID with the member name
    pub async fn get_details(&self, admin: AdminId, id: i32) -> AppResult<TransactionDetails> {
        let query = format!("{} WHERE t.id = $1 AND t.admin_id = $2", TRANSACTION_DETAILS);
        sqlx::query_as::<_, TransactionDetails>(&query)
            .bind(id)
            .bind(admin.0)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction with id {} not found", id)))
    }

    /// List transactions, optionally filtered by a member-name search term
    pub async fn list(
        &self,
        admin: AdminId,
        search: Option<&str>,
    ) -> AppResult<Vec<TransactionDetails>> {
        let pattern = search.map(|s| format!("%{}%", s));
        let query = format!(
            r#"{}
            WHERE t.admin_id = $1
              AND ($2::text IS NULL OR m.name ILIKE $2)
            ORDER BY t.created_at DESC
            "#,
            TRANSACTION_DETAILS
        );
        let transactions = sqlx::query_as::<_, TransactionDetails>(&query)
            .bind(admin.0)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(transactions)
    }

    /// Record a standalone settlement for a member
    pub async fn record(
        &self,
        admin: AdminId,
        transaction: &RecordTransaction,
    ) -> AppResult<TransactionDetails> {
        let member: Option<i32> =
            sqlx::query_scalar("SELECT id FROM members WHERE id = $1 AND admin_id = $2")
                .bind(transaction.member_id)
                .bind(admin.0)
                .fetch_optional(&self.pool)
                .await?;
        let member_id = member.ok_or_else(|| {
            AppError::NotFound(format!("Member with id {} not found", transaction.member_id))
        })?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (admin_id, member_id, amount, payment_method)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(admin.0)
        .bind(member_id)
        .bind(transaction.amount)
        .bind(transaction.payment_method.as_code())
        .fetch_one(&self.pool)
        .await?;

        self.get_details(admin, id).await
    }

    /// Administrative delete of a settlement record
    pub async fn delete(&self, admin: AdminId, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND admin_id = $2")
            .bind(id)
            .bind(admin.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Transaction with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// Total money collected for the tenant
    pub async fn total_for_admin(&self, admin: AdminId) -> AppResult<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE admin_id = $1",
        )
        .bind(admin.0)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}

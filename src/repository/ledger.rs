//! Lending ledger repository: the borrow-record state machine.
//!
//! Every mutation here runs as a single database transaction covering the
//! ledger row, the book's quantity/status and the settlement record, so a
//! failure anywhere rolls back everything. Book rows are locked with
//! `SELECT ... FOR UPDATE` before availability is checked, which serializes
//! concurrent lends of the same copies; locks are taken in ascending id
//! order so two multi-book lends cannot deadlock each other.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowedBook, BorrowedBookDetails, LendReceipt, LendRequest, UpdateBorrowedBook},
        enums::PaymentMethod,
        librarian::AdminId,
    },
};

/// Outstanding-fines threshold above which a member may not borrow.
/// The check is strictly greater-than: a member owing exactly the limit
/// may still borrow.
static BORROW_LIMIT: Lazy<Decimal> = Lazy::new(|| Decimal::from(500));

/// SELECT producing [`BorrowedBookDetails`] rows; `$2` binds "today" for the
/// overdue computation.
const BORROW_DETAILS: &str = r#"
    SELECT b.id, b.member_id, m.name AS member_name,
           b.book_id, k.title AS book_title, k.author AS book_author,
           b.return_date, b.fine, b.returned,
           (b.returned = FALSE AND b.return_date < $2) AS is_overdue,
           b.created_at
    FROM borrowed_books b
    JOIN members m ON b.member_id = m.id
    JOIN books k ON b.book_id = k.id
"#;

/// Book row locked for a lend: just what availability and fee accumulation need
#[derive(Debug, Clone, FromRow)]
struct BookLock {
    id: i32,
    quantity: i32,
    borrowing_fee: Decimal,
}

/// Validated mutation set for one lend request
#[derive(Debug, PartialEq)]
struct LendPlan {
    /// (book_id, copies) in ascending book id order
    decrements: Vec<(i32, i32)>,
    /// Sum of borrowing fees over all lent copies
    amount: Decimal,
}

/// Validate a whole lend request against the member's outstanding fines and
/// the locked stock, before anything is written. Any failure here aborts the
/// request with nothing committed.
fn plan_lend(amount_due: Decimal, book_ids: &[i32], stock: &[BookLock]) -> AppResult<LendPlan> {
    if amount_due > *BORROW_LIMIT {
        return Err(AppError::BorrowLimitExceeded(format!(
            "Member owes {} which exceeds the borrowing limit of {}",
            amount_due, *BORROW_LIMIT
        )));
    }

    // Copies requested per book; BTreeMap keeps the apply order deterministic
    let mut copies: BTreeMap<i32, i32> = BTreeMap::new();
    for id in book_ids {
        *copies.entry(*id).or_insert(0) += 1;
    }

    let mut decrements = Vec::with_capacity(copies.len());
    let mut amount = Decimal::ZERO;
    for (id, requested) in &copies {
        // Missing-for-this-tenant and out-of-stock report identically
        let book = stock
            .iter()
            .find(|b| b.id == *id)
            .ok_or_else(|| AppError::BookUnavailable(format!("Book with id {} is not available", id)))?;
        if book.quantity < *requested {
            return Err(AppError::BookUnavailable(format!(
                "Book with id {} is not available",
                id
            )));
        }
        decrements.push((*id, *requested));
        amount += book.borrowing_fee * Decimal::from(*requested);
    }

    Ok(LendPlan { decrements, amount })
}

#[derive(Clone)]
pub struct LedgerRepository {
    pool: Pool<Postgres>,
}

impl LedgerRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID, scoped to the acting librarian
    pub async fn get_by_id(&self, admin: AdminId, id: i32) -> AppResult<BorrowedBook> {
        sqlx::query_as::<_, BorrowedBook>(
            "SELECT * FROM borrowed_books WHERE id = $1 AND admin_id = $2",
        )
        .bind(id)
        .bind(admin.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// Get borrow record with member/book details
    pub async fn get_details(
        &self,
        admin: AdminId,
        id: i32,
        today: NaiveDate,
    ) -> AppResult<BorrowedBookDetails> {
        let query = format!("{} WHERE b.id = $1 AND b.admin_id = $3", BORROW_DETAILS);
        sqlx::query_as::<_, BorrowedBookDetails>(&query)
            .bind(id)
            .bind(today)
            .bind(admin.0)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// List borrow records with member/book details; `overdue_only` restricts
    /// to unreturned records past their return date, `search` filters on the
    /// book title/author.
    pub async fn list(
        &self,
        admin: AdminId,
        today: NaiveDate,
        overdue_only: bool,
        search: Option<&str>,
    ) -> AppResult<Vec<BorrowedBookDetails>> {
        let pattern = search.map(|s| format!("%{}%", s));
        let query = format!(
            r#"{}
            WHERE b.admin_id = $1
              AND ($3::boolean = FALSE OR (b.returned = FALSE AND b.return_date < $2))
              AND ($4::text IS NULL OR k.title ILIKE $4 OR k.author ILIKE $4)
            ORDER BY b.created_at DESC
            "#,
            BORROW_DETAILS
        );
        let records = sqlx::query_as::<_, BorrowedBookDetails>(&query)
            .bind(admin.0)
            .bind(today)
            .bind(overdue_only)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Lend one or more books to a member.
    ///
    /// One transaction: lock the member, check the borrowing limit, lock all
    /// requested books, validate the whole set, then create the ledger rows,
    /// decrement stock and record one settlement for the summed fees. Any
    /// per-book failure aborts the entire request.
    pub async fn lend(&self, admin: AdminId, request: &LendRequest) -> AppResult<LendReceipt> {
        let mut tx = self.pool.begin().await?;

        let member: Option<i32> =
            sqlx::query_scalar("SELECT id FROM members WHERE id = $1 AND admin_id = $2 FOR UPDATE")
                .bind(request.member_id)
                .bind(admin.0)
                .fetch_optional(&mut *tx)
                .await?;
        let member_id = member.ok_or_else(|| {
            AppError::NotFound(format!("Member with id {} not found", request.member_id))
        })?;

        let amount_due: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(fine), 0) FROM borrowed_books
            WHERE member_id = $1 AND admin_id = $2 AND returned = FALSE
            "#,
        )
        .bind(member_id)
        .bind(admin.0)
        .fetch_one(&mut *tx)
        .await?;

        // Lock in ascending id order; duplicates collapse to one lock
        let mut ordered: Vec<i32> = request.book_ids.clone();
        ordered.sort_unstable();
        ordered.dedup();

        let mut stock = Vec::with_capacity(ordered.len());
        for book_id in &ordered {
            let lock = sqlx::query_as::<_, BookLock>(
                r#"
                SELECT id, quantity, borrowing_fee FROM books
                WHERE id = $1 AND admin_id = $2
                FOR UPDATE
                "#,
            )
            .bind(book_id)
            .bind(admin.0)
            .fetch_optional(&mut *tx)
            .await?;
            if let Some(lock) = lock {
                stock.push(lock);
            }
        }

        let plan = plan_lend(amount_due, &request.book_ids, &stock)?;

        let mut borrowed_ids = Vec::with_capacity(request.book_ids.len());
        for (book_id, copies) in &plan.decrements {
            for _ in 0..*copies {
                let borrowed_id: i32 = sqlx::query_scalar(
                    r#"
                    INSERT INTO borrowed_books (admin_id, member_id, book_id, return_date, fine)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(admin.0)
                .bind(member_id)
                .bind(book_id)
                .bind(request.return_date)
                .bind(request.fine)
                .fetch_one(&mut *tx)
                .await?;
                borrowed_ids.push(borrowed_id);
            }

            sqlx::query(
                r#"
                UPDATE books
                SET quantity = quantity - $1,
                    status = CASE WHEN quantity - $1 = 0 THEN 'not-available' ELSE 'available' END,
                    updated_at = now()
                WHERE id = $2 AND admin_id = $3
                "#,
            )
            .bind(copies)
            .bind(book_id)
            .bind(admin.0)
            .execute(&mut *tx)
            .await?;
        }

        let transaction_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (admin_id, member_id, amount, payment_method)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(admin.0)
        .bind(member_id)
        .bind(plan.amount)
        .bind(request.payment_method.as_code())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LendReceipt {
            borrowed_ids,
            amount: plan.amount,
            transaction_id,
        })
    }

    /// Return a borrow record on time.
    ///
    /// Refuses a record that is already returned, and refuses an overdue
    /// record (the caller must go through fine settlement instead). No
    /// settlement is recorded: the fee was collected at lend time.
    pub async fn return_on_time(
        &self,
        admin: AdminId,
        id: i32,
        today: NaiveDate,
    ) -> AppResult<BorrowedBook> {
        let mut tx = self.pool.begin().await?;

        let record = self.lock_record(&mut tx, admin, id).await?;
        if record.returned {
            return Err(AppError::InvalidState(
                "Borrow record is already returned".to_string(),
            ));
        }
        if record.return_date < today {
            return Err(AppError::InvalidState(
                "Borrow record is overdue; fine settlement is required".to_string(),
            ));
        }

        sqlx::query("UPDATE borrowed_books SET returned = TRUE WHERE id = $1")
            .bind(record.id)
            .execute(&mut *tx)
            .await?;

        self.restock_one(&mut tx, admin, record.book_id).await?;

        tx.commit().await?;

        Ok(BorrowedBook {
            returned: true,
            ..record
        })
    }

    /// Settle the fine on a borrow record: mark it returned, restock the
    /// book and record one settlement for the fine amount.
    ///
    /// The `returned` guard makes this idempotent-unsafe by design: a second
    /// invocation fails InvalidState instead of double-counting the stock or
    /// duplicating the settlement.
    pub async fn settle_fine(
        &self,
        admin: AdminId,
        id: i32,
        payment_method: PaymentMethod,
    ) -> AppResult<(BorrowedBook, i32)> {
        let mut tx = self.pool.begin().await?;

        let record = self.lock_record(&mut tx, admin, id).await?;
        if record.returned {
            return Err(AppError::InvalidState(
                "Borrow record is already returned".to_string(),
            ));
        }

        sqlx::query("UPDATE borrowed_books SET returned = TRUE WHERE id = $1")
            .bind(record.id)
            .execute(&mut *tx)
            .await?;

        self.restock_one(&mut tx, admin, record.book_id).await?;

        let transaction_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (admin_id, member_id, amount, payment_method)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(admin.0)
        .bind(record.member_id)
        .bind(record.fine)
        .bind(payment_method.as_code())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((
            BorrowedBook {
                returned: true,
                ..record
            },
            transaction_id,
        ))
    }

    /// Update the return date and fine of an outstanding borrow record
    pub async fn update(
        &self,
        admin: AdminId,
        id: i32,
        update: &UpdateBorrowedBook,
    ) -> AppResult<BorrowedBook> {
        let mut tx = self.pool.begin().await?;

        let record = self.lock_record(&mut tx, admin, id).await?;
        if record.returned {
            return Err(AppError::InvalidState(
                "Borrow record is already returned".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, BorrowedBook>(
            r#"
            UPDATE borrowed_books SET return_date = $1, fine = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(update.return_date)
        .bind(update.fine)
        .bind(record.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Administrative delete: remove the record and undo the lend by
    /// restocking one copy, whatever state the record is in.
    pub async fn delete(&self, admin: AdminId, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let record = self.lock_record(&mut tx, admin, id).await?;

        self.restock_one(&mut tx, admin, record.book_id).await?;

        sqlx::query("DELETE FROM borrowed_books WHERE id = $1")
            .bind(record.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Count unreturned borrow records
    pub async fn count_active(&self, admin: AdminId) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowed_books WHERE admin_id = $1 AND returned = FALSE",
        )
        .bind(admin.0)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count overdue borrow records
    pub async fn count_overdue(&self, admin: AdminId, today: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM borrowed_books
            WHERE admin_id = $1 AND returned = FALSE AND return_date < $2
            "#,
        )
        .bind(admin.0)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Sum of fines across currently-overdue borrow records
    pub async fn overdue_exposure(&self, admin: AdminId, today: NaiveDate) -> AppResult<Decimal> {
        let exposure: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(fine), 0) FROM borrowed_books
            WHERE admin_id = $1 AND returned = FALSE AND return_date < $2
            "#,
        )
        .bind(admin.0)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(exposure)
    }

    /// Lock a borrow record for mutation, scoped to the acting librarian
    async fn lock_record(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        admin: AdminId,
        id: i32,
    ) -> AppResult<BorrowedBook> {
        sqlx::query_as::<_, BorrowedBook>(
            "SELECT * FROM borrowed_books WHERE id = $1 AND admin_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(admin.0)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// Put one copy back on the shelf and re-derive the book's status
    async fn restock_one(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        admin: AdminId,
        book_id: i32,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE books
            SET quantity = quantity + 1, status = 'available', updated_at = now()
            WHERE id = $1 AND admin_id = $2
            "#,
        )
        .bind(book_id)
        .bind(admin.0)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(entries: &[(i32, i32, i32)]) -> Vec<BookLock> {
        entries
            .iter()
            .map(|(id, quantity, fee)| BookLock {
                id: *id,
                quantity: *quantity,
                borrowing_fee: Decimal::from(*fee),
            })
            .collect()
    }

    #[test]
    fn lend_plan_sums_fees_across_books() {
        let stock = stock(&[(1, 3, 10), (2, 1, 25)]);
        let plan = plan_lend(Decimal::ZERO, &[1, 2], &stock).unwrap();
        assert_eq!(plan.decrements, vec![(1, 1), (2, 1)]);
        assert_eq!(plan.amount, Decimal::from(35));
    }

    #[test]
    fn duplicate_ids_need_enough_copies() {
        let stock = stock(&[(1, 2, 10)]);
        let plan = plan_lend(Decimal::ZERO, &[1, 1], &stock).unwrap();
        assert_eq!(plan.decrements, vec![(1, 2)]);
        assert_eq!(plan.amount, Decimal::from(20));

        let err = plan_lend(Decimal::ZERO, &[1, 1, 1], &stock).unwrap_err();
        assert!(matches!(err, AppError::BookUnavailable(_)));
    }

    #[test]
    fn missing_book_fails_the_whole_request() {
        let stock = stock(&[(1, 5, 10)]);
        let err = plan_lend(Decimal::ZERO, &[1, 99], &stock).unwrap_err();
        assert!(matches!(err, AppError::BookUnavailable(_)));
    }

    #[test]
    fn zero_quantity_is_unavailable() {
        let stock = stock(&[(1, 0, 10)]);
        let err = plan_lend(Decimal::ZERO, &[1], &stock).unwrap_err();
        assert!(matches!(err, AppError::BookUnavailable(_)));
    }

    #[test]
    fn limit_blocks_only_above_the_threshold() {
        let stock = stock(&[(1, 1, 10)]);

        // Exactly at the limit still passes
        let plan = plan_lend(Decimal::from(500), &[1], &stock);
        assert!(plan.is_ok());

        let err = plan_lend(Decimal::new(50001, 2), &[1], &stock).unwrap_err();
        assert!(matches!(err, AppError::BorrowLimitExceeded(_)));
    }
}

//! Lending service: borrow-record lifecycle over the ledger repository.
//!
//! All date comparisons use the injected clock so overdue behavior is
//! deterministic under test.

use std::sync::Arc;

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowedBookDetails, LendReceipt, LendRequest, UpdateBorrowedBook},
        enums::PaymentMethod,
        librarian::AdminId,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl LendingService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Lend one or more books to a member as one atomic batch
    pub async fn lend(&self, admin: AdminId, request: LendRequest) -> AppResult<LendReceipt> {
        if request.book_ids.is_empty() {
            return Err(AppError::Validation(
                "At least one book must be selected".to_string(),
            ));
        }
        if request.fine.is_sign_negative() {
            return Err(AppError::Validation("Fine must not be negative".to_string()));
        }

        let receipt = self.repository.ledger.lend(admin, &request).await?;
        tracing::info!(
            "Lent {} book(s) to member {}: amount={}",
            receipt.borrowed_ids.len(),
            request.member_id,
            receipt.amount
        );
        Ok(receipt)
    }

    /// List borrow records; `overdue_only` restricts to overdue ones
    pub async fn list(
        &self,
        admin: AdminId,
        overdue_only: bool,
        search: Option<&str>,
    ) -> AppResult<Vec<BorrowedBookDetails>> {
        self.repository
            .ledger
            .list(admin, self.clock.today(), overdue_only, search)
            .await
    }

    /// Get borrow record with member/book details
    pub async fn get(&self, admin: AdminId, id: i32) -> AppResult<BorrowedBookDetails> {
        self.repository
            .ledger
            .get_details(admin, id, self.clock.today())
            .await
    }

    /// Update the return date and fine of an outstanding borrow record
    pub async fn update(
        &self,
        admin: AdminId,
        id: i32,
        update: UpdateBorrowedBook,
    ) -> AppResult<BorrowedBookDetails> {
        if update.fine.is_sign_negative() {
            return Err(AppError::Validation("Fine must not be negative".to_string()));
        }
        self.repository.ledger.update(admin, id, &update).await?;
        self.get(admin, id).await
    }

    /// Return a borrow record on time.
    ///
    /// An overdue record fails closed here and must go through
    /// [`Self::settle_fine`] instead.
    pub async fn return_book(&self, admin: AdminId, id: i32) -> AppResult<BorrowedBookDetails> {
        self.repository
            .ledger
            .return_on_time(admin, id, self.clock.today())
            .await?;
        tracing::info!("Borrow record {} returned on time", id);
        self.get(admin, id).await
    }

    /// Settle the fine on a borrow record and close it
    pub async fn settle_fine(
        &self,
        admin: AdminId,
        id: i32,
        payment_method: PaymentMethod,
    ) -> AppResult<(BorrowedBookDetails, i32)> {
        let (record, transaction_id) = self
            .repository
            .ledger
            .settle_fine(admin, id, payment_method)
            .await?;
        tracing::info!(
            "Fine of {} settled on borrow record {} via {}",
            record.fine,
            id,
            payment_method
        );
        let details = self.get(admin, id).await?;
        Ok((details, transaction_id))
    }

    /// Administrative delete of a borrow record; restocks one copy
    pub async fn delete(&self, admin: AdminId, id: i32) -> AppResult<()> {
        self.repository.ledger.delete(admin, id).await?;
        tracing::info!("Borrow record {} deleted", id);
        Ok(())
    }

    /// Count unreturned borrow records
    pub async fn count_active(&self, admin: AdminId) -> AppResult<i64> {
        self.repository.ledger.count_active(admin).await
    }

    /// Count overdue borrow records
    pub async fn count_overdue(&self, admin: AdminId) -> AppResult<i64> {
        self.repository
            .ledger
            .count_overdue(admin, self.clock.today())
            .await
    }
}

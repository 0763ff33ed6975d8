//! Settlement service: the append-only money ledger

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::{
        librarian::AdminId,
        payment::{RecordTransaction, TransactionDetails},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct SettlementService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl SettlementService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// List settlement records, optionally filtered by member name
    pub async fn list(
        &self,
        admin: AdminId,
        search: Option<&str>,
    ) -> AppResult<Vec<TransactionDetails>> {
        self.repository.payments.list(admin, search).await
    }

    /// Record a standalone settlement
    pub async fn record(
        &self,
        admin: AdminId,
        transaction: RecordTransaction,
    ) -> AppResult<TransactionDetails> {
        if transaction.amount.is_sign_negative() {
            return Err(AppError::Validation(
                "Amount must not be negative".to_string(),
            ));
        }
        let recorded = self.repository.payments.record(admin, &transaction).await?;
        tracing::info!(
            "Payment recorded: id={} amount={} via {}",
            recorded.id,
            recorded.amount,
            recorded.payment_method
        );
        Ok(recorded)
    }

    /// Administrative delete of a settlement record
    pub async fn delete(&self, admin: AdminId, id: i32) -> AppResult<()> {
        self.repository.payments.delete(admin, id).await?;
        tracing::info!("Payment deleted: id={}", id);
        Ok(())
    }

    /// Total money collected for the tenant
    pub async fn total_for_admin(&self, admin: AdminId) -> AppResult<Decimal> {
        self.repository.payments.total_for_admin(admin).await
    }

    /// Sum of fines across currently-overdue borrow records
    pub async fn overdue_exposure(&self, admin: AdminId) -> AppResult<Decimal> {
        self.repository
            .ledger
            .overdue_exposure(admin, self.clock.today())
            .await
    }
}

//! Dashboard statistics service

use std::sync::Arc;

use crate::{
    api::stats::DashboardResponse,
    clock::Clock,
    error::AppResult,
    models::librarian::AdminId,
    repository::Repository,
};

/// How many recently-added books the dashboard shows
const RECENT_BOOKS: i64 = 4;

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl StatsService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Tenant dashboard: entity counts, recent acquisitions and the money
    /// aggregates (total collected, overdue exposure)
    pub async fn dashboard(&self, admin: AdminId) -> AppResult<DashboardResponse> {
        let today = self.clock.today();

        let total_members = self.repository.members.count(admin).await?;
        let total_books = self.repository.books.count(admin).await?;
        let total_borrowed_books = self.repository.ledger.count_active(admin).await?;
        let total_overdue_books = self.repository.ledger.count_overdue(admin, today).await?;
        let recently_added_books = self
            .repository
            .books
            .recently_added(admin, RECENT_BOOKS)
            .await?;
        let total_amount = self.repository.payments.total_for_admin(admin).await?;
        let overdue_amount = self.repository.ledger.overdue_exposure(admin, today).await?;

        Ok(DashboardResponse {
            total_members,
            total_books,
            total_borrowed_books,
            total_overdue_books,
            recently_added_books,
            total_amount,
            overdue_amount,
        })
    }
}

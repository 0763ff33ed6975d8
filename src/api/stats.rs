//! Dashboard statistics endpoint

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::book::Book};

use super::AuthenticatedAdmin;

/// Tenant dashboard numbers
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Total number of members
    pub total_members: i64,
    /// Total number of books
    pub total_books: i64,
    /// Books currently out on loan
    pub total_borrowed_books: i64,
    /// Loans past their return date
    pub total_overdue_books: i64,
    /// Most recently added books
    pub recently_added_books: Vec<Book>,
    /// Total money collected
    pub total_amount: Decimal,
    /// Fines accrued on currently-overdue loans
    pub overdue_amount: Decimal,
}

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
) -> AppResult<Json<DashboardResponse>> {
    let stats = state.services.stats.dashboard(admin).await?;
    Ok(Json(stats))
}

//! Lending ledger endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::{
        borrow::{BorrowedBookDetails, LendRequest, UpdateBorrowedBook},
        enums::PaymentMethod,
    },
};

use super::AuthenticatedAdmin;

/// Lend request: one member, one or more books
#[derive(Deserialize, ToSchema)]
pub struct LendBooksRequest {
    /// Member ID
    pub member_id: i32,
    /// Book IDs; a book listed twice lends two copies
    pub book_ids: Vec<i32>,
    /// Return date shared by all lent copies
    pub return_date: NaiveDate,
    /// Fine charged per copy if returned late
    pub fine: Decimal,
    /// Payment method for the borrowing fees
    pub payment_method: PaymentMethod,
}

/// Lend response with the settlement receipt
#[derive(Serialize, ToSchema)]
pub struct LendResponse {
    /// Created borrow record IDs
    pub borrowed_ids: Vec<i32>,
    /// Total borrowing fees collected
    pub amount: Decimal,
    /// Settlement transaction ID
    pub transaction_id: i32,
    /// Status message
    pub message: String,
}

/// Return response with record details
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// Borrow record details
    pub record: BorrowedBookDetails,
}

/// Fine settlement request
#[derive(Deserialize, ToSchema)]
pub struct SettleFineRequest {
    /// Payment method for the fine
    pub payment_method: PaymentMethod,
}

/// Fine settlement response
#[derive(Serialize, ToSchema)]
pub struct SettleFineResponse {
    /// Settlement status
    pub status: String,
    /// Borrow record details
    pub record: BorrowedBookDetails,
    /// Settlement transaction ID
    pub transaction_id: i32,
}

/// Borrow record list filters
#[derive(Debug, Deserialize, IntoParams)]
pub struct LoanListQuery {
    /// Restrict to currently-overdue records
    pub overdue: Option<bool>,
    /// Case-insensitive search over book title/author
    pub search: Option<String>,
}

/// List borrow records
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(LoanListQuery),
    responses(
        (status = 200, description = "Borrow records for the acting librarian", body = Vec<BorrowedBookDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Query(query): Query<LoanListQuery>,
) -> AppResult<Json<Vec<BorrowedBookDetails>>> {
    let records = state
        .services
        .lending
        .list(admin, query.overdue.unwrap_or(false), query.search.as_deref())
        .await?;
    Ok(Json(records))
}

/// Get a single borrow record
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow record ID")),
    responses(
        (status = 200, description = "Borrow record", body = BorrowedBookDetails),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowedBookDetails>> {
    let record = state.services.lending.get(admin, id).await?;
    Ok(Json(record))
}

/// Lend books to a member
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = LendBooksRequest,
    responses(
        (status = 201, description = "Books lent", body = LendResponse),
        (status = 404, description = "Member not found"),
        (status = 409, description = "A requested book is not available"),
        (status = 422, description = "Member has exceeded the borrowing limit")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Json(request): Json<LendBooksRequest>,
) -> AppResult<(StatusCode, Json<LendResponse>)> {
    let receipt = state
        .services
        .lending
        .lend(
            admin,
            LendRequest {
                member_id: request.member_id,
                book_ids: request.book_ids,
                return_date: request.return_date,
                fine: request.fine,
                payment_method: request.payment_method,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LendResponse {
            borrowed_ids: receipt.borrowed_ids,
            amount: receipt.amount,
            transaction_id: receipt.transaction_id,
            message: "Books lent successfully".to_string(),
        }),
    ))
}

/// Update the return date and fine of an outstanding borrow record
#[utoipa::path(
    put,
    path = "/loans/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow record ID")),
    request_body = UpdateBorrowedBook,
    responses(
        (status = 200, description = "Borrow record updated", body = BorrowedBookDetails),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Record already returned")
    )
)]
pub async fn update_loan(
    State(state): State<crate::AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBorrowedBook>,
) -> AppResult<Json<BorrowedBookDetails>> {
    let record = state.services.lending.update(admin, id, request).await?;
    Ok(Json(record))
}

/// Return a borrowed book on time.
///
/// An overdue record is refused here; settle its fine instead.
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow record ID")),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned, or overdue and requiring fine settlement")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let record = state.services.lending.return_book(admin, id).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        record,
    }))
}

/// Settle the fine on a borrow record and close it
#[utoipa::path(
    post,
    path = "/loans/{id}/settle-fine",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow record ID")),
    request_body = SettleFineRequest,
    responses(
        (status = 200, description = "Fine settled, book returned", body = SettleFineResponse),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn settle_fine(
    State(state): State<crate::AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
    Json(request): Json<SettleFineRequest>,
) -> AppResult<Json<SettleFineResponse>> {
    let (record, transaction_id) = state
        .services
        .lending
        .settle_fine(admin, id, request.payment_method)
        .await?;

    Ok(Json(SettleFineResponse {
        status: "settled".to_string(),
        record,
        transaction_id,
    }))
}

/// Administrative delete of a borrow record; restocks one copy
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow record ID")),
    responses(
        (status = 204, description = "Borrow record deleted"),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn delete_loan(
    State(state): State<crate::AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.lending.delete(admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

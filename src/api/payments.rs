//! Settlement (payments) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::payment::{RecordTransaction, TransactionDetails},
};

use super::{AuthenticatedAdmin, SearchQuery};

/// List settlement records
#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "Payments for the acting librarian", body = Vec<TransactionDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_payments(
    State(state): State<crate::AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<TransactionDetails>>> {
    let payments = state
        .services
        .settlement
        .list(admin, query.search.as_deref())
        .await?;
    Ok(Json(payments))
}

/// Record a standalone settlement for a member
#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    security(("bearer_auth" = [])),
    request_body = RecordTransaction,
    responses(
        (status = 201, description = "Payment recorded", body = TransactionDetails),
        (status = 400, description = "Invalid payment data"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn record_payment(
    State(state): State<crate::AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Json(request): Json<RecordTransaction>,
) -> AppResult<(StatusCode, Json<TransactionDetails>)> {
    let payment = state.services.settlement.record(admin, request).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Administrative delete of a settlement record
#[utoipa::path(
    delete,
    path = "/payments/{id}",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Transaction ID")),
    responses(
        (status = 204, description = "Payment deleted"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn delete_payment(
    State(state): State<crate::AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.settlement.delete(admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

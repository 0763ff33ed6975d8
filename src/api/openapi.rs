//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, lending, members, payments, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atheneum API",
        version = "1.0.0",
        description = "Library Lending Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        // Loans
        lending::list_loans,
        lending::get_loan,
        lending::create_loan,
        lending::update_loan,
        lending::return_loan,
        lending::settle_fine,
        lending::delete_loan,
        // Payments
        payments::list_payments,
        payments::record_payment,
        payments::delete_payment,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::librarian::LibrarianInfo,
            crate::models::librarian::RegisterLibrarian,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::enums::BookStatus,
            crate::models::enums::Category,
            // Members
            crate::models::member::MemberDetails,
            crate::models::member::CreateMember,
            crate::models::member::UpdateMember,
            // Loans
            lending::LendBooksRequest,
            lending::LendResponse,
            lending::ReturnResponse,
            lending::SettleFineRequest,
            lending::SettleFineResponse,
            crate::models::borrow::BorrowedBookDetails,
            crate::models::borrow::BorrowState,
            crate::models::borrow::LendReceipt,
            crate::models::borrow::UpdateBorrowedBook,
            // Payments
            crate::models::payment::TransactionDetails,
            crate::models::payment::RecordTransaction,
            crate::models::enums::PaymentMethod,
            // Stats
            stats::DashboardResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Librarian authentication"),
        (name = "books", description = "Book catalog management"),
        (name = "members", description = "Member management"),
        (name = "loans", description = "Lending ledger"),
        (name = "payments", description = "Settlement records"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

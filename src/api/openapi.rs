//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, members};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Members, books, borrowing and late-return penalties"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        members::list_members,
        books::list_books,
        books::list_available_books,
        // Loans
        loans::borrow_book,
        loans::return_book,
    ),
    components(
        schemas(
            crate::models::MemberWithLoans,
            crate::models::Book,
            crate::models::LoanRequest,
            health::HealthResponse,
            health::LendingTerms,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "members", description = "Library members"),
        (name = "books", description = "Book catalog"),
        (name = "loans", description = "Borrowing and returning")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

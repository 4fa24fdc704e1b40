//! Borrow and return endpoints

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::LoanRequest,
    AppState,
};

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrowBook",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Book borrowed successfully", body = String, content_type = "text/plain"),
        (status = 400, description = "Penalty active, out of stock, limit reached or unknown code", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoanRequest>, AppError>,
) -> AppResult<&'static str> {
    request.validate()?;

    state
        .services
        .loans
        .borrow_book(&request.member_code, &request.book_code)
        .await?;

    Ok("Book borrowed successfully")
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/returnBook",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Book returned, with or without penalty", body = String, content_type = "text/plain"),
        (status = 400, description = "This member has not borrowed this book", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoanRequest>, AppError>,
) -> AppResult<&'static str> {
    request.validate()?;

    let outcome = state
        .services
        .loans
        .return_book(&request.member_code, &request.book_code)
        .await?;

    Ok(outcome.message())
}

//! Book endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::Book, AppState};

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "A list of books", body = Vec<Book>),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// List books with at least one copy in stock
#[utoipa::path(
    get,
    path = "/availableBooks",
    tag = "books",
    responses(
        (status = 200, description = "A list of available books", body = Vec<Book>),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_available_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_available_books().await?;
    Ok(Json(books))
}

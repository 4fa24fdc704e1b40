//! Member endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::MemberWithLoans, AppState};

/// List all members with the number of books they currently hold
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    responses(
        (status = 200, description = "A list of members", body = Vec<MemberWithLoans>),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_members(State(state): State<AppState>) -> AppResult<Json<Vec<MemberWithLoans>>> {
    let members = state.services.catalog.list_members().await?;
    Ok(Json(members))
}

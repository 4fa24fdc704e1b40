//! Health check endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{config::LoansConfig, AppState};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
    /// Lending rules the service was started with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lending: Option<LendingTerms>,
}

#[derive(Serialize, ToSchema)]
pub struct LendingTerms {
    pub max_open_loans: i64,
    pub loan_period_days: i64,
    pub penalty_days: i64,
}

impl From<&LoansConfig> for LendingTerms {
    fn from(loans: &LoansConfig) -> Self {
        Self {
            max_open_loans: loans.max_open_loans,
            loan_period_days: loans.loan_period_days,
            penalty_days: loans.penalty_days,
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        lending: Some(LendingTerms::from(&state.config.loans)),
    })
}

/// Readiness check endpoint (checks store connectivity)
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, label) = if state.services.store_ready().await {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            lending: None,
        }),
    )
}

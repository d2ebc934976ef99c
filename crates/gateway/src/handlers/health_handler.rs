//! Health check handlers.

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use common::AppResult;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Name of the default country zone
    pub default_country: String,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check endpoint - reads the default country to prove the database answers.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 500, description = "Database unreachable")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let country = state.services.cities().default_country().await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        default_country: country.name,
    }))
}

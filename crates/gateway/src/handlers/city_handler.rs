//! City handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;
use crm_service_lib::service::CityQuery;
use domain::City;

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// City lookup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResolveCityRequest {
    #[validate(length(min = 1, message = "City name cannot be empty"))]
    #[schema(example = "Saint-Etienne")]
    pub city: String,
    #[serde(default)]
    #[schema(example = "42000")]
    pub zip_code: String,
    /// Empty for the default country
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub default_department: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CityExistsParams {
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

/// Create city routes
pub fn city_routes() -> Router<AppState> {
    Router::new()
        .route("/resolve", post(resolve_city))
        .route("/exists", get(city_exists))
}

/// Find the city, creating it and its country when missing
#[utoipa::path(
    post,
    path = "/cities/resolve",
    tag = "Cities",
    request_body = ResolveCityRequest,
    responses(
        (status = 200, description = "Existing or new city", body = City),
        (status = 400, description = "Invalid zip code for new city")
    )
)]
pub async fn resolve_city(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResolveCityRequest>,
) -> AppResult<Json<City>> {
    let query = CityQuery {
        city_name: payload.city,
        zip_code: payload.zip_code,
        country: payload.country,
        default_department: payload.default_department,
    };
    let city = state.services.cities().resolve_city(query).await?;
    Ok(Json(city))
}

/// Whether exactly one city matches
#[utoipa::path(
    get,
    path = "/cities/exists",
    tag = "Cities",
    params(CityExistsParams),
    responses(
        (status = 200, description = "Lookup result", body = bool)
    )
)]
pub async fn city_exists(
    State(state): State<AppState>,
    Query(params): Query<CityExistsParams>,
) -> AppResult<Json<bool>> {
    let exists = state
        .services
        .cities()
        .check_city_exists(&params.city, &params.zip_code, &params.country)
        .await?;
    Ok(Json(exists))
}

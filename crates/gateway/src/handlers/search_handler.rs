//! Search handlers.

use axum::{
    extract::State,
    response::Json,
    routing::post,
    Router,
};

use common::AppResult;
use crm_service_lib::service::search::{ContactHit, EntityResults, SearchRequest};

use crate::state::AppState;

/// Create search routes
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", post(search_contacts))
        .route("/entities", post(search_by_entity))
        .route("/emails", post(search_emails))
}

/// Matching contacts as a flat list
#[utoipa::path(
    post,
    path = "/search/contacts",
    tag = "Search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching contacts", body = Vec<ContactHit>),
        (status = 400, description = "Unknown filter or malformed value")
    )
)]
pub async fn search_contacts(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<Vec<ContactHit>>> {
    let hits = state.services.search().search_contacts(request).await?;
    Ok(Json(hits))
}

/// Matching contacts grouped by entity
#[utoipa::path(
    post,
    path = "/search/entities",
    tag = "Search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Entities sorted by name", body = EntityResults),
        (status = 400, description = "Unknown filter or malformed value")
    )
)]
pub async fn search_by_entity(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<EntityResults>> {
    let results = state.services.search().search_by_entity(request).await?;
    Ok(Json(results))
}

#[utoipa::path(
    post,
    path = "/search/emails",
    tag = "Search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "`\"Full Name\" <email>` lines", body = Vec<String>),
        (status = 400, description = "Unknown filter or malformed value")
    )
)]
pub async fn search_emails(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<Vec<String>>> {
    let emails = state.services.search().search_emails(request).await?;
    Ok(Json(emails))
}

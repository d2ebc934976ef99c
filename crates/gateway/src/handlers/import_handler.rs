//! Contacts import handlers.
//!
//! Files are posted as the raw request body, in the encoding and separator
//! configured on the import.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use common::AppResult;
use crm_service_lib::service::ImportPreview;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ConfirmParams {
    /// Department code for new cities without a usable zip code
    #[serde(default)]
    #[param(example = "42")]
    pub default_department: String,
}

/// Number of contacts touched by a batch.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchResponse {
    pub contacts: usize,
}

/// Create import routes
pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/template", get(template))
        .route("/unsubscribe", post(unsubscribe))
        .route("/:id/preview", post(preview))
        .route("/:id/confirm", post(confirm))
}

/// Header line of a blank import file
#[utoipa::path(
    get,
    path = "/imports/template",
    tag = "Imports",
    responses(
        (status = 200, description = "CSV header", body = String, content_type = "text/csv")
    )
)]
pub async fn template(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let header_line = state.services.imports().template().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=contacts-import-template.csv"),
        ],
        header_line,
    ))
}

/// Parse a file and flag what already exists, without writing anything
#[utoipa::path(
    post,
    path = "/imports/{id}/preview",
    tag = "Imports",
    params(
        ("id" = Uuid, Path, description = "Import ID")
    ),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Interpreted lines", body = ImportPreview),
        (status = 400, description = "Unreadable file"),
        (status = 404, description = "Import not found")
    )
)]
pub async fn preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> AppResult<Json<ImportPreview>> {
    let preview = state.services.imports().preview(id, body.to_vec()).await?;
    Ok(Json(preview))
}

/// Create the records of every line, all or nothing
#[utoipa::path(
    post,
    path = "/imports/{id}/confirm",
    tag = "Imports",
    params(
        ("id" = Uuid, Path, description = "Import ID"),
        ConfirmParams
    ),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Contacts written", body = BatchResponse),
        (status = 400, description = "Unreadable file or invalid line"),
        (status = 404, description = "Import not found")
    )
)]
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ConfirmParams>,
    body: Bytes,
) -> AppResult<Json<BatchResponse>> {
    let contacts = state
        .services
        .imports()
        .confirm(id, body.to_vec(), params.default_department)
        .await?;
    Ok(Json(BatchResponse { contacts }))
}

/// Opt the listed emails out of every subscription
#[utoipa::path(
    post,
    path = "/imports/unsubscribe",
    tag = "Imports",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Contacts that had a subscription", body = BatchResponse),
        (status = 400, description = "Unreadable file")
    )
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<BatchResponse>> {
    let contacts = state.services.imports().unsubscribe(body.to_vec()).await?;
    Ok(Json(BatchResponse { contacts }))
}

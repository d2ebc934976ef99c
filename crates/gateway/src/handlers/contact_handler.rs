//! Contact and entity handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use common::AppResult;
use domain::{Contact, Entity};

use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SameAsParams {
    /// Contact being edited, left out of the suggestions
    pub contact_id: Option<Uuid>,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub email: String,
}

/// Create contact routes
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/same-as", get(suggested_same_as))
        .route("/:id", delete(delete_contact))
}

/// Create entity routes
pub fn entity_routes() -> Router<AppState> {
    Router::new().route("/", post(save_entity))
}

/// Contacts that may be the same person
#[utoipa::path(
    get,
    path = "/contacts/same-as",
    tag = "Contacts",
    params(SameAsParams),
    responses(
        (status = 200, description = "Candidate contacts", body = Vec<Contact>)
    )
)]
pub async fn suggested_same_as(
    State(state): State<AppState>,
    Query(params): Query<SameAsParams>,
) -> AppResult<Json<Vec<Contact>>> {
    let contacts = state
        .services
        .contacts()
        .suggested_same_as(params.contact_id, &params.lastname, &params.firstname, &params.email)
        .await?;
    Ok(Json(contacts))
}

/// Delete a contact and repair its same-as group
#[utoipa::path(
    delete,
    path = "/contacts/{id}",
    tag = "Contacts",
    params(
        ("id" = Uuid, Path, description = "Contact ID")
    ),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 404, description = "Contact not found")
    )
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.contacts().delete_contact(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Save an entity and repair its contacts
#[utoipa::path(
    post,
    path = "/entities",
    tag = "Contacts",
    request_body = Entity,
    responses(
        (status = 200, description = "Saved entity", body = Entity)
    )
)]
pub async fn save_entity(
    State(state): State<AppState>,
    Json(entity): Json<Entity>,
) -> AppResult<Json<Entity>> {
    let saved = state.services.contacts().save_entity(entity).await?;
    Ok(Json(saved))
}

//! Action handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{post, put},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{Action, ActionPriority};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Action create/update request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ActionRequest {
    #[validate(length(max = 200, message = "Subject is limited to 200 characters"))]
    #[serde(default)]
    #[schema(example = "Call back about the renewal")]
    pub subject: String,
    pub planned_date: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub type_id: Option<Uuid>,
    #[serde(default)]
    pub detail: String,
    /// 1 low, 2 medium, 3 high
    #[validate(range(min = 1, max = 3, message = "Priority must be 1, 2 or 3"))]
    #[serde(default = "default_priority")]
    pub priority: i32,
    pub opportunity_id: Option<Uuid>,
    #[serde(default)]
    pub done: bool,
    pub in_charge_id: Option<Uuid>,
    #[serde(default)]
    pub archived: bool,
    #[schema(value_type = Option<String>, example = "120.50")]
    pub amount: Option<Decimal>,
    /// Left at 0 for types that number their actions
    #[validate(range(min = 0, message = "Number cannot be negative"))]
    #[serde(default)]
    pub number: i32,
    pub status_id: Option<Uuid>,
    #[serde(default)]
    pub contact_ids: Vec<Uuid>,
    #[serde(default)]
    pub entity_ids: Vec<Uuid>,
}

fn default_priority() -> i32 {
    ActionPriority::default().into()
}

impl ActionRequest {
    fn into_action(self) -> AppResult<Action> {
        let priority = ActionPriority::try_from(self.priority).map_err(AppError::validation)?;
        Ok(Action {
            planned_date: self.planned_date,
            end_datetime: self.end_datetime,
            type_id: self.type_id,
            detail: self.detail,
            priority,
            opportunity_id: self.opportunity_id,
            done: self.done,
            in_charge_id: self.in_charge_id,
            archived: self.archived,
            amount: self.amount,
            number: self.number,
            status_id: self.status_id,
            contact_ids: self.contact_ids,
            entity_ids: self.entity_ids,
            ..Action::new(self.subject)
        })
    }
}

/// Create action routes
pub fn action_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_action))
        .route("/:id", put(update_action))
}

/// Create an action, closing or numbering it from its status and type
#[utoipa::path(
    post,
    path = "/actions",
    tag = "Actions",
    request_body = ActionRequest,
    responses(
        (status = 201, description = "Action created", body = Action),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Unknown status or type")
    )
)]
pub async fn create_action(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ActionRequest>,
) -> AppResult<(StatusCode, Json<Action>)> {
    let action = state
        .services
        .actions()
        .create_action(payload.into_action()?)
        .await?;
    Ok((StatusCode::CREATED, Json(action)))
}

/// Update an action
#[utoipa::path(
    put,
    path = "/actions/{id}",
    tag = "Actions",
    params(
        ("id" = Uuid, Path, description = "Action ID")
    ),
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Action updated", body = Action),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Action, status or type not found")
    )
)]
pub async fn update_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ActionRequest>,
) -> AppResult<Json<Action>> {
    let action = state
        .services
        .actions()
        .update_action(id, payload.into_action()?)
        .await?;
    Ok(Json(action))
}

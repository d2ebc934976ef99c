//! Action service - saves actions with their done state and number.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::infra::UnitOfWork;
use common::{AppResult, OptionExt};
use domain::Action;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Action service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ActionService: Send + Sync {
    /// Insert a new action
    async fn create_action(&self, action: Action) -> AppResult<Action>;

    /// Replace an existing action
    async fn update_action(&self, id: Uuid, action: Action) -> AppResult<Action>;
}

/// Concrete implementation of ActionService using Unit of Work.
pub struct ActionManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ActionManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Apply the status rules and the type numbering, then persist.
    ///
    /// Serializable so two saves cannot take the same type number.
    async fn save(&self, mut action: Action, existing: Option<Uuid>) -> AppResult<Action> {
        self.uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let actions = ctx.actions();
                    if let Some(id) = existing {
                        let current = actions.get_action(id).await?.ok_or_not_found("Action")?;
                        action.id = current.id;
                        action.created = current.created;
                    }

                    let status = match action.status_id {
                        Some(status_id) => Some(
                            actions
                                .get_status(status_id)
                                .await?
                                .ok_or_not_found("Action status")?,
                        ),
                        None => None,
                    };
                    let action_type = match action.type_id {
                        Some(type_id) => {
                            Some(actions.get_type(type_id).await?.ok_or_not_found("Action type")?)
                        }
                        None => None,
                    };
                    let type_has_final_status = match &action_type {
                        Some(action_type) => actions.type_has_final_status(action_type.id).await?,
                        None => false,
                    };

                    let now = Utc::now();
                    action.apply_done_rules(status.as_ref(), type_has_final_status, now);
                    if let Some(updated) = action_type.and_then(|t| action.assign_number(&t)) {
                        actions.save_action_type(&updated).await?;
                    }
                    action.modified = now;
                    actions.save_action(&action).await
                })
            })
            .await
    }
}

#[async_trait]
impl<U: UnitOfWork> ActionService for ActionManager<U> {
    async fn create_action(&self, action: Action) -> AppResult<Action> {
        let saved = self.save(action, None).await?;
        tracing::debug!("Created action {}", saved.id);
        Ok(saved)
    }

    async fn update_action(&self, id: Uuid, action: Action) -> AppResult<Action> {
        self.save(action, Some(id)).await
    }
}

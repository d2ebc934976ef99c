//! Action, action type and action status repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::activity::{
    action, action_contact, action_entity, action_status, action_type, action_type_status,
};
use super::DbHandle;
use common::{AppError, AppResult};
use domain::{Action, ActionStatus, ActionType};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ActionRepository: Send + Sync {
    async fn get_action(&self, id: Uuid) -> AppResult<Option<Action>>;

    async fn get_status(&self, id: Uuid) -> AppResult<Option<ActionStatus>>;

    async fn get_type(&self, id: Uuid) -> AppResult<Option<ActionType>>;

    /// True when one of the statuses the type allows is final
    async fn type_has_final_status(&self, type_id: Uuid) -> AppResult<bool>;

    /// Insert or update an action with its contacts and entities
    async fn save_action(&self, action: &Action) -> AppResult<Action>;

    /// Persist the numbering counter of a type
    async fn save_action_type(&self, action_type: &ActionType) -> AppResult<ActionType>;
}

/// SeaORM implementation of ActionRepository
pub struct ActionStore<H = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> ActionStore<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }

    async fn allowed_status_ids(&self, type_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(action_type_status::Entity::find()
            .filter(action_type_status::Column::ActionTypeId.eq(type_id))
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|link| link.action_status_id)
            .collect())
    }
}

#[async_trait]
impl<H: DbHandle> ActionRepository for ActionStore<H> {
    async fn get_action(&self, id: Uuid) -> AppResult<Option<Action>> {
        let Some(model) = action::Entity::find_by_id(id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?
        else {
            return Ok(None);
        };

        let contact_ids = action_contact::Entity::find()
            .filter(action_contact::Column::ActionId.eq(id))
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|link| link.contact_id)
            .collect();
        let entity_ids = action_entity::Entity::find()
            .filter(action_entity::Column::ActionId.eq(id))
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|link| link.entity_id)
            .collect();

        Ok(Some(model.into_domain(contact_ids, entity_ids)))
    }

    async fn get_status(&self, id: Uuid) -> AppResult<Option<ActionStatus>> {
        let model = action_status::Entity::find_by_id(id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(model.map(ActionStatus::from))
    }

    async fn get_type(&self, id: Uuid) -> AppResult<Option<ActionType>> {
        let model = action_type::Entity::find_by_id(id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;

        match model {
            Some(model) => {
                let allowed = self.allowed_status_ids(id).await?;
                Ok(Some(model.into_domain(allowed)))
            }
            None => Ok(None),
        }
    }

    async fn type_has_final_status(&self, type_id: Uuid) -> AppResult<bool> {
        let allowed = self.allowed_status_ids(type_id).await?;
        if allowed.is_empty() {
            return Ok(false);
        }

        let final_status = action_status::Entity::find()
            .filter(action_status::Column::Id.is_in(allowed))
            .filter(action_status::Column::IsFinal.eq(true))
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;
        Ok(final_status.is_some())
    }

    async fn save_action(&self, crm_action: &Action) -> AppResult<Action> {
        let exists = action::Entity::find_by_id(crm_action.id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?
            .is_some();

        let mut active_model = action::ActiveModel::from(crm_action);
        active_model.modified = Set(chrono::Utc::now());

        let model = if exists {
            active_model.update(self.db.conn()).await
        } else {
            active_model.insert(self.db.conn()).await
        }
        .map_err(AppError::from)?;

        action_contact::Entity::delete_many()
            .filter(action_contact::Column::ActionId.eq(crm_action.id))
            .exec(self.db.conn())
            .await
            .map_err(AppError::from)?;
        if !crm_action.contact_ids.is_empty() {
            let links = crm_action.contact_ids.iter().map(|contact_id| action_contact::ActiveModel {
                action_id: Set(crm_action.id),
                contact_id: Set(*contact_id),
            });
            action_contact::Entity::insert_many(links)
                .exec(self.db.conn())
                .await
                .map_err(AppError::from)?;
        }

        action_entity::Entity::delete_many()
            .filter(action_entity::Column::ActionId.eq(crm_action.id))
            .exec(self.db.conn())
            .await
            .map_err(AppError::from)?;
        if !crm_action.entity_ids.is_empty() {
            let links = crm_action.entity_ids.iter().map(|entity_id| action_entity::ActiveModel {
                action_id: Set(crm_action.id),
                entity_id: Set(*entity_id),
            });
            action_entity::Entity::insert_many(links)
                .exec(self.db.conn())
                .await
                .map_err(AppError::from)?;
        }

        Ok(model.into_domain(crm_action.contact_ids.clone(), crm_action.entity_ids.clone()))
    }

    async fn save_action_type(&self, crm_type: &ActionType) -> AppResult<ActionType> {
        let model = action_type::Entity::find_by_id(crm_type.id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("Action type"))?;

        let mut active: action_type::ActiveModel = model.into();
        active.name = Set(crm_type.name.clone());
        active.number_auto_generated = Set(crm_type.number_auto_generated);
        active.last_number = Set(crm_type.last_number);

        let model = active.update(self.db.conn()).await.map_err(AppError::from)?;
        Ok(model.into_domain(crm_type.allowed_status_ids.clone()))
    }
}

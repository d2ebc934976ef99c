//! Custom field repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::custom_field::{
    contact_custom_field_value, custom_field, entity_custom_field_value,
};
use super::DbHandle;
use common::{AppError, AppResult};
use domain::CustomField;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CustomFieldRepository: Send + Sync {
    /// Fields with an import column, by import order
    async fn list_by_import_order(&self) -> AppResult<Vec<CustomField>>;

    /// Write (or overwrite) the value of a field on an entity
    async fn set_entity_value(&self, custom_field_id: Uuid, entity_id: Uuid, value: String) -> AppResult<()>;

    /// Write (or overwrite) the value of a field on a contact
    async fn set_contact_value(&self, custom_field_id: Uuid, contact_id: Uuid, value: String) -> AppResult<()>;
}

/// SeaORM implementation of CustomFieldRepository
pub struct CustomFieldStore<H = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> CustomFieldStore<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<H: DbHandle> CustomFieldRepository for CustomFieldStore<H> {
    async fn list_by_import_order(&self) -> AppResult<Vec<CustomField>> {
        let models = custom_field::Entity::find()
            .filter(custom_field::Column::ImportOrder.gt(0))
            .order_by_asc(custom_field::Column::ImportOrder)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(CustomField::from).collect())
    }

    async fn set_entity_value(&self, custom_field_id: Uuid, entity_id: Uuid, value: String) -> AppResult<()> {
        let existing = entity_custom_field_value::Entity::find_by_id((custom_field_id, entity_id))
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;

        match existing {
            Some(model) => {
                let mut active: entity_custom_field_value::ActiveModel = model.into();
                active.value = Set(value);
                active.update(self.db.conn()).await.map_err(AppError::from)?;
            }
            None => {
                entity_custom_field_value::ActiveModel {
                    custom_field_id: Set(custom_field_id),
                    entity_id: Set(entity_id),
                    value: Set(value),
                }
                .insert(self.db.conn())
                .await
                .map_err(AppError::from)?;
            }
        }
        Ok(())
    }

    async fn set_contact_value(&self, custom_field_id: Uuid, contact_id: Uuid, value: String) -> AppResult<()> {
        let existing = contact_custom_field_value::Entity::find_by_id((custom_field_id, contact_id))
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;

        match existing {
            Some(model) => {
                let mut active: contact_custom_field_value::ActiveModel = model.into();
                active.value = Set(value);
                active.update(self.db.conn()).await.map_err(AppError::from)?;
            }
            None => {
                contact_custom_field_value::ActiveModel {
                    custom_field_id: Set(custom_field_id),
                    contact_id: Set(contact_id),
                    value: Set(value),
                }
                .insert(self.db.conn())
                .await
                .map_err(AppError::from)?;
            }
        }
        Ok(())
    }
}

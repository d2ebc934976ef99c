//! Entity and entity type repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::entities::directory::{entity, entity_type};
use super::{lower_eq, DbHandle};
use common::{AppError, AppResult};
use domain::{Entity, EntityType};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Entity type named `name`, ignoring case
    async fn find_entity_type_by_name(&self, name: &str) -> AppResult<Option<EntityType>>;

    async fn create_entity_type(&self, name: String) -> AppResult<EntityType>;

    /// Entities named `name`, ignoring case, oldest first
    async fn find_entities_by_name(&self, name: &str) -> AppResult<Vec<Entity>>;

    async fn get_entity(&self, id: Uuid) -> AppResult<Option<Entity>>;

    /// Insert or update an entity
    async fn save_entity(&self, entity: &Entity) -> AppResult<Entity>;
}

/// SeaORM implementation of EntityRepository
pub struct EntityStore<H = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> EntityStore<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<H: DbHandle> EntityRepository for EntityStore<H> {
    async fn find_entity_type_by_name(&self, name: &str) -> AppResult<Option<EntityType>> {
        let model = entity_type::Entity::find()
            .filter(lower_eq(entity_type::Column::Name, name))
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(model.map(EntityType::from))
    }

    async fn create_entity_type(&self, name: String) -> AppResult<EntityType> {
        let active_model = entity_type::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
        };

        let model = active_model
            .insert(self.db.conn())
            .await
            .map_err(AppError::from)?;
        Ok(EntityType::from(model))
    }

    async fn find_entities_by_name(&self, name: &str) -> AppResult<Vec<Entity>> {
        let models = entity::Entity::find()
            .filter(lower_eq(entity::Column::Name, name))
            .order_by_asc(entity::Column::Created)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Entity::from).collect())
    }

    async fn get_entity(&self, id: Uuid) -> AppResult<Option<Entity>> {
        let model = entity::Entity::find_by_id(id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(model.map(Entity::from))
    }

    async fn save_entity(&self, crm_entity: &Entity) -> AppResult<Entity> {
        let exists = entity::Entity::find_by_id(crm_entity.id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?
            .is_some();

        let mut active_model = entity::ActiveModel::from(crm_entity);
        active_model.modified = Set(chrono::Utc::now());

        let model = if exists {
            active_model.update(self.db.conn()).await
        } else {
            active_model.insert(self.db.conn()).await
        }
        .map_err(AppError::from)?;

        Ok(Entity::from(model))
    }
}

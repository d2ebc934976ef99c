//! Group repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::directory::{group, group_contact, group_entity};
use super::{lower_eq, DbHandle};
use common::{AppError, AppResult};
use domain::Group;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Group named `name`, ignoring case (names are stored trimmed)
    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<Group>>;

    async fn create_group(&self, name: &str) -> AppResult<Group>;

    /// Add an entity to a group; no-op if already a member
    async fn add_entity(&self, group_id: Uuid, entity_id: Uuid) -> AppResult<()>;

    /// Add a contact to a group; no-op if already a member
    async fn add_contact(&self, group_id: Uuid, contact_id: Uuid) -> AppResult<()>;
}

/// SeaORM implementation of GroupRepository
pub struct GroupStore<H = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> GroupStore<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<H: DbHandle> GroupRepository for GroupStore<H> {
    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<Group>> {
        let model = group::Entity::find()
            .filter(lower_eq(group::Column::Name, name.trim()))
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(model.map(Group::from))
    }

    async fn create_group(&self, name: &str) -> AppResult<Group> {
        let new_group = Group::new(name);
        let active_model = group::ActiveModel {
            id: Set(new_group.id),
            name: Set(new_group.name),
            description: Set(new_group.description),
            subscribe_form: Set(new_group.subscribe_form),
        };

        let model = active_model
            .insert(self.db.conn())
            .await
            .map_err(AppError::from)?;
        Ok(Group::from(model))
    }

    async fn add_entity(&self, group_id: Uuid, entity_id: Uuid) -> AppResult<()> {
        let existing = group_entity::Entity::find_by_id((group_id, entity_id))
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;
        if existing.is_some() {
            return Ok(());
        }

        group_entity::ActiveModel {
            group_id: Set(group_id),
            entity_id: Set(entity_id),
        }
        .insert(self.db.conn())
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn add_contact(&self, group_id: Uuid, contact_id: Uuid) -> AppResult<()> {
        let existing = group_contact::Entity::find_by_id((group_id, contact_id))
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;
        if existing.is_some() {
            return Ok(());
        }

        group_contact::ActiveModel {
            group_id: Set(group_id),
            contact_id: Set(contact_id),
        }
        .insert(self.db.conn())
        .await
        .map_err(AppError::from)?;
        Ok(())
    }
}

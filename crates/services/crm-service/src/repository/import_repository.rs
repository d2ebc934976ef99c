//! Contacts import repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::entities::contacts_import::{contacts_import, contacts_import_group};
use super::DbHandle;
use common::{AppError, AppResult};
use domain::ContactsImport;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImportRepository: Send + Sync {
    /// Import settings with their group ids
    async fn get_import(&self, id: Uuid) -> AppResult<Option<ContactsImport>>;
}

/// SeaORM implementation of ImportRepository
pub struct ImportStore<H = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> ImportStore<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<H: DbHandle> ImportRepository for ImportStore<H> {
    async fn get_import(&self, id: Uuid) -> AppResult<Option<ContactsImport>> {
        let Some(model) = contacts_import::Entity::find_by_id(id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?
        else {
            return Ok(None);
        };

        let group_ids = contacts_import_group::Entity::find()
            .filter(contacts_import_group::Column::ImportId.eq(id))
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|link| link.group_id)
            .collect();

        Ok(Some(model.into_domain(group_ids)))
    }
}

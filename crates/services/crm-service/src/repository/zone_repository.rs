//! Zone and city repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::geography::{city, zone};
use super::{lower_eq, DbHandle};
use common::{AppError, AppResult};
use domain::text::contains_folded;
use domain::{City, NewZone, Zone, ZONE_TYPE_COUNTRY};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Geographic lookups used by the city resolver.
///
/// Name matching that must ignore accents runs in memory on the candidate
/// rows, since the database only lowercases.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    /// Country zones whose name contains `name`, ignoring case and accents, sorted by name
    async fn find_countries_matching(&self, name: &str) -> AppResult<Vec<Zone>>;

    /// Country zones named exactly `name`, sorted by name
    async fn find_countries_by_name(&self, name: &str) -> AppResult<Vec<Zone>>;

    /// First zone (by name) carrying this code
    async fn find_zone_by_code(&self, code: &str) -> AppResult<Option<Zone>>;

    async fn create_zone(&self, zone: NewZone) -> AppResult<Zone>;

    /// Cities of a parent whose name contains `name`, ignoring case and accents, sorted by name
    async fn find_cities_matching(&self, parent_id: Uuid, name: &str) -> AppResult<Vec<City>>;

    /// Cities of a parent named `name`, ignoring case
    async fn find_cities_by_name(&self, parent_id: Uuid, name: &str) -> AppResult<Vec<City>>;

    async fn create_city(&self, name: String, parent_id: Uuid) -> AppResult<City>;
}

/// SeaORM implementation of ZoneRepository
pub struct ZoneStore<H = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> ZoneStore<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<H: DbHandle> ZoneRepository for ZoneStore<H> {
    async fn find_countries_matching(&self, name: &str) -> AppResult<Vec<Zone>> {
        let models = zone::Entity::find()
            .filter(zone::Column::ZoneType.eq(ZONE_TYPE_COUNTRY))
            .order_by_asc(zone::Column::Name)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(models
            .into_iter()
            .filter(|m| contains_folded(&m.name, name))
            .map(Zone::from)
            .collect())
    }

    async fn find_countries_by_name(&self, name: &str) -> AppResult<Vec<Zone>> {
        let models = zone::Entity::find()
            .filter(zone::Column::ZoneType.eq(ZONE_TYPE_COUNTRY))
            .filter(zone::Column::Name.eq(name))
            .order_by_asc(zone::Column::Name)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Zone::from).collect())
    }

    async fn find_zone_by_code(&self, code: &str) -> AppResult<Option<Zone>> {
        let model = zone::Entity::find()
            .filter(zone::Column::Code.eq(code))
            .order_by_asc(zone::Column::Name)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(model.map(Zone::from))
    }

    async fn create_zone(&self, new_zone: NewZone) -> AppResult<Zone> {
        let active_model = zone::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_zone.name),
            code: Set(new_zone.code),
            zone_type: Set(new_zone.zone_type.code().to_string()),
            parent_id: Set(new_zone.parent_id),
        };

        let model = active_model
            .insert(self.db.conn())
            .await
            .map_err(AppError::from)?;
        Ok(Zone::from(model))
    }

    async fn find_cities_matching(&self, parent_id: Uuid, name: &str) -> AppResult<Vec<City>> {
        let models = city::Entity::find()
            .filter(city::Column::ParentId.eq(parent_id))
            .order_by_asc(city::Column::Name)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(models
            .into_iter()
            .filter(|m| contains_folded(&m.name, name))
            .map(City::from)
            .collect())
    }

    async fn find_cities_by_name(&self, parent_id: Uuid, name: &str) -> AppResult<Vec<City>> {
        let models = city::Entity::find()
            .filter(city::Column::ParentId.eq(parent_id))
            .filter(lower_eq(city::Column::Name, name))
            .order_by_asc(city::Column::Name)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(City::from).collect())
    }

    async fn create_city(&self, name: String, parent_id: Uuid) -> AppResult<City> {
        let active_model = city::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            parent_id: Set(Some(parent_id)),
        };

        let model = active_model
            .insert(self.db.conn())
            .await
            .map_err(AppError::from)?;
        Ok(City::from(model))
    }
}

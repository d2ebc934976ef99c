//! Contact queries behind the search filters.
//!
//! The search service turns its filters into a [`ContactQuery`]; this store
//! runs it as one select over contacts joined to their entity.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationDef, Select,
};
use uuid::Uuid;

use super::entities::directory::{contact, entity};
use super::entities::geography::{city, zone};
use super::DbHandle;
use common::{AppError, AppResult};
use domain::{City, Contact, Entity, Zone, ZoneIndex};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Where clause over `contacts` joined to `entities`, plus an optional
/// leading sort expression.
#[derive(Debug, Clone)]
pub struct ContactQuery {
    pub condition: Condition,
    pub rank: Option<SimpleExpr>,
}

impl ContactQuery {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            rank: None,
        }
    }

    /// The select this query runs as.
    pub fn select(self) -> Select<contact::Entity> {
        let mut select = contact::Entity::find()
            .join(JoinType::InnerJoin, contact_entity())
            .filter(self.condition);
        if let Some(rank) = self.rank {
            select = select.order_by_asc(rank);
        }
        select
            .order_by_asc(contact::Column::Lastname)
            .order_by_asc(contact::Column::Firstname)
    }
}

fn contact_entity() -> RelationDef {
    contact::Entity::belongs_to(entity::Entity)
        .from(contact::Column::EntityId)
        .to(entity::Column::Id)
        .into()
}

/// Contacts in query order with the entities they belong to.
#[derive(Debug, Clone, Default)]
pub struct MatchedContacts {
    pub contacts: Vec<Contact>,
    pub entities: HashMap<Uuid, Entity>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SearchRepository: Send + Sync {
    async fn find_contacts(&self, query: ContactQuery) -> AppResult<MatchedContacts>;

    /// Every zone and the given cities, for sorting by place
    async fn zone_index(&self, city_ids: Vec<Uuid>) -> AppResult<ZoneIndex>;
}

/// SeaORM implementation of SearchRepository
pub struct SearchStore<H = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> SearchStore<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<H: DbHandle> SearchRepository for SearchStore<H> {
    async fn find_contacts(&self, query: ContactQuery) -> AppResult<MatchedContacts> {
        let conn = self.db.conn();

        let contacts = query.select().all(conn).await.map_err(AppError::from)?;
        let mut entity_ids: Vec<Uuid> = contacts.iter().map(|c| c.entity_id).collect();
        entity_ids.sort_unstable();
        entity_ids.dedup();

        let entities = if entity_ids.is_empty() {
            Vec::new()
        } else {
            entity::Entity::find()
                .filter(entity::Column::Id.is_in(entity_ids))
                .all(conn)
                .await
                .map_err(AppError::from)?
        };

        tracing::debug!(contacts = contacts.len(), "Search query ran");
        Ok(MatchedContacts {
            contacts: contacts.into_iter().map(Contact::from).collect(),
            entities: entities
                .into_iter()
                .map(|model| (model.id, Entity::from(model)))
                .collect(),
        })
    }

    async fn zone_index(&self, city_ids: Vec<Uuid>) -> AppResult<ZoneIndex> {
        let conn = self.db.conn();

        let (zones, cities) = tokio::try_join!(
            zone::Entity::find().all(conn),
            city::Entity::find()
                .filter(city::Column::Id.is_in(city_ids))
                .all(conn),
        )
        .map_err(AppError::from)?;

        Ok(ZoneIndex::new(
            zones.into_iter().map(Zone::from).collect(),
            cities.into_iter().map(City::from).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::Expr;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_select_joins_entity_and_orders_by_name() {
        let sql = ContactQuery::new(Condition::all().add(entity::Column::Name.eq("Acme")))
            .select()
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(
            r#"INNER JOIN "entities" ON "contacts"."entity_id" = "entities"."id""#
        ));
        assert!(sql.contains(r#"WHERE "entities"."name" = 'Acme'"#));
        assert!(sql.ends_with(r#"ORDER BY "contacts"."lastname" ASC, "contacts"."firstname" ASC"#));
    }

    #[test]
    fn test_rank_sorts_first() {
        let query = ContactQuery {
            condition: Condition::all(),
            rank: Some(Expr::col((contact::Entity, contact::Column::SameAsPriority)).into()),
        };
        let sql = query.select().build(DbBackend::Postgres).to_string();

        assert!(sql.contains(r#"ORDER BY "contacts"."same_as_priority" ASC, "contacts"."lastname" ASC"#));
    }
}

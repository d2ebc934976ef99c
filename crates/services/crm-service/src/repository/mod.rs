//! Repository layer for data access.
//!
//! Every store is generic over a [`DbHandle`], so the same code runs against
//! the connection pool and against an open transaction.

pub mod entities;
mod action_repository;
mod contact_repository;
mod custom_field_repository;
mod entity_repository;
mod group_repository;
mod import_repository;
mod search_repository;
mod subscription_repository;
mod zone_repository;

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction};

pub use action_repository::{ActionRepository, ActionStore};
pub use contact_repository::{ContactRepository, ContactStore};
pub use custom_field_repository::{CustomFieldRepository, CustomFieldStore};
pub use entity_repository::{EntityRepository, EntityStore};
pub use group_repository::{GroupRepository, GroupStore};
pub use import_repository::{ImportRepository, ImportStore};
pub use search_repository::{ContactQuery, MatchedContacts, SearchRepository, SearchStore};
pub use subscription_repository::{SubscriptionRepository, SubscriptionStore};
pub use zone_repository::{ZoneRepository, ZoneStore};

#[cfg(any(test, feature = "test-utils"))]
pub use action_repository::MockActionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use contact_repository::MockContactRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use custom_field_repository::MockCustomFieldRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use entity_repository::MockEntityRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use group_repository::MockGroupRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use import_repository::MockImportRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use search_repository::MockSearchRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use subscription_repository::MockSubscriptionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use zone_repository::MockZoneRepository;

/// Something SeaORM queries can run on: the pool or a borrowed transaction.
pub trait DbHandle: Send + Sync {
    type Conn: ConnectionTrait + Send + Sync;

    fn conn(&self) -> &Self::Conn;
}

impl DbHandle for DatabaseConnection {
    type Conn = DatabaseConnection;

    fn conn(&self) -> &Self::Conn {
        self
    }
}

impl<'a> DbHandle for &'a DatabaseTransaction {
    type Conn = DatabaseTransaction;

    fn conn(&self) -> &Self::Conn {
        self
    }
}

/// Case-insensitive equality on a text column.
pub(crate) fn lower_eq<C>(column: C, value: &str) -> sea_orm::sea_query::SimpleExpr
where
    C: sea_orm::sea_query::IntoColumnRef,
{
    use sea_orm::sea_query::{Expr, Func};

    Expr::expr(Func::lower(Expr::col(column))).eq(value.to_lowercase())
}

//! Service Container - one place to reach every CRM service.
//!
//! Callers depend on the service traits; only [`Services::from_connection`]
//! knows the concrete managers and the persistence they share.

use std::sync::Arc;

use common::CrmSettings;
use sea_orm::DatabaseConnection;

use super::{ActionService, CityService, ContactService, ImportService, SearchService};
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn search(&self) -> Arc<dyn SearchService>;

    fn imports(&self) -> Arc<dyn ImportService>;

    fn actions(&self) -> Arc<dyn ActionService>;

    fn contacts(&self) -> Arc<dyn ContactService>;

    fn cities(&self) -> Arc<dyn CityService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    search: Arc<dyn SearchService>,
    imports: Arc<dyn ImportService>,
    actions: Arc<dyn ActionService>,
    contacts: Arc<dyn ContactService>,
    cities: Arc<dyn CityService>,
}

impl Services {
    /// Build every manager over one persistence layer.
    pub fn from_connection(db: DatabaseConnection, settings: CrmSettings) -> Self {
        use super::{ActionManager, CityManager, ContactManager, ImportManager, SearchManager};

        let uow = Arc::new(Persistence::new(db));
        let settings = Arc::new(settings);

        Self {
            search: Arc::new(SearchManager::new(uow.clone(), settings.clone())),
            imports: Arc::new(ImportManager::new(uow.clone(), settings.clone())),
            actions: Arc::new(ActionManager::new(uow.clone())),
            contacts: Arc::new(ContactManager::new(uow.clone())),
            cities: Arc::new(CityManager::new(uow, settings)),
        }
    }
}

impl ServiceContainer for Services {
    fn search(&self) -> Arc<dyn SearchService> {
        self.search.clone()
    }

    fn imports(&self) -> Arc<dyn ImportService> {
        self.imports.clone()
    }

    fn actions(&self) -> Arc<dyn ActionService> {
        self.actions.clone()
    }

    fn contacts(&self) -> Arc<dyn ContactService> {
        self.contacts.clone()
    }

    fn cities(&self) -> Arc<dyn CityService> {
        self.cities.clone()
    }
}

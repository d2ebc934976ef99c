//! Service layer - CRM use cases over the unit of work.

mod action_service;
mod city_service;
mod contact_service;
mod container;
pub mod import;
pub mod search;

pub use action_service::{ActionManager, ActionService};
pub use city_service::{resolve_optional_city, CityManager, CityQuery, CityResolver, CityService};
pub use contact_service::{save_entity_with_rules, ContactManager, ContactService};
pub use container::{ServiceContainer, Services};
pub use import::{ImportManager, ImportPreview, ImportService};
pub use search::{SearchManager, SearchRequest, SearchService};

#[cfg(any(test, feature = "test-utils"))]
pub use {
    action_service::MockActionService, city_service::MockCityService,
    contact_service::MockContactService, container::MockServiceContainer,
    import::MockImportService, search::MockSearchService,
};

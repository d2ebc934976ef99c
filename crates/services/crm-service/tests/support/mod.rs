//! Test unit of work over mocked repositories.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppResult, CrmSettings};
use crm_service_lib::infra::{RepositorySet, TransactionContext, UnitOfWork};
use crm_service_lib::repository::{
    ActionRepository, ContactRepository, CustomFieldRepository, EntityRepository,
    GroupRepository, ImportRepository, MockActionRepository, MockContactRepository,
    MockCustomFieldRepository, MockEntityRepository, MockGroupRepository, MockImportRepository,
    MockSearchRepository, MockSubscriptionRepository, MockZoneRepository, SearchRepository,
    SubscriptionRepository, ZoneRepository,
};

/// Mocks to set expectations on before building the unit of work.
#[derive(Default)]
pub struct Mocks {
    pub zones: MockZoneRepository,
    pub entities: MockEntityRepository,
    pub contacts: MockContactRepository,
    pub groups: MockGroupRepository,
    pub actions: MockActionRepository,
    pub custom_fields: MockCustomFieldRepository,
    pub subscriptions: MockSubscriptionRepository,
    pub imports: MockImportRepository,
    pub search: MockSearchRepository,
}

impl Mocks {
    pub fn into_uow(self) -> Arc<TestUnitOfWork> {
        Arc::new(TestUnitOfWork {
            zones: Arc::new(self.zones),
            entities: Arc::new(self.entities),
            contacts: Arc::new(self.contacts),
            groups: Arc::new(self.groups),
            actions: Arc::new(self.actions),
            custom_fields: Arc::new(self.custom_fields),
            subscriptions: Arc::new(self.subscriptions),
            imports: Arc::new(self.imports),
            search: Arc::new(self.search),
        })
    }
}

/// Test UnitOfWork whose transactions run straight against the mocks.
pub struct TestUnitOfWork {
    zones: Arc<MockZoneRepository>,
    entities: Arc<MockEntityRepository>,
    contacts: Arc<MockContactRepository>,
    groups: Arc<MockGroupRepository>,
    actions: Arc<MockActionRepository>,
    custom_fields: Arc<MockCustomFieldRepository>,
    subscriptions: Arc<MockSubscriptionRepository>,
    imports: Arc<MockImportRepository>,
    search: Arc<MockSearchRepository>,
}

impl TestUnitOfWork {
    fn repos(&self) -> RepositorySet<'_> {
        RepositorySet {
            zones: self.zones.as_ref(),
            entities: self.entities.as_ref(),
            contacts: self.contacts.as_ref(),
            groups: self.groups.as_ref(),
            actions: self.actions.as_ref(),
            custom_fields: self.custom_fields.as_ref(),
            subscriptions: self.subscriptions.as_ref(),
            imports: self.imports.as_ref(),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn zones(&self) -> Arc<dyn ZoneRepository> {
        self.zones.clone()
    }

    fn entities(&self) -> Arc<dyn EntityRepository> {
        self.entities.clone()
    }

    fn contacts(&self) -> Arc<dyn ContactRepository> {
        self.contacts.clone()
    }

    fn groups(&self) -> Arc<dyn GroupRepository> {
        self.groups.clone()
    }

    fn actions(&self) -> Arc<dyn ActionRepository> {
        self.actions.clone()
    }

    fn custom_fields(&self) -> Arc<dyn CustomFieldRepository> {
        self.custom_fields.clone()
    }

    fn subscriptions(&self) -> Arc<dyn SubscriptionRepository> {
        self.subscriptions.clone()
    }

    fn imports(&self) -> Arc<dyn ImportRepository> {
        self.imports.clone()
    }

    fn search(&self) -> Arc<dyn SearchRepository> {
        self.search.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        f(TransactionContext::new(self.repos())).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        f(TransactionContext::new(self.repos())).await
    }
}

pub fn settings() -> Arc<CrmSettings> {
    Arc::new(CrmSettings::default())
}

//! Unit of Work: repository access and scoped transactions.
//!
//! Reads go through the pool-backed stores returned by the accessors.
//! Mutations run inside [`UnitOfWork::transaction`], where every repository
//! handed out by the [`TransactionContext`] shares one database transaction
//! that is committed on `Ok` and rolled back on `Err`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{AccessMode, DatabaseConnection, IsolationLevel, TransactionTrait};

use crate::repository::{
    ActionRepository, ActionStore, ContactRepository, ContactStore, CustomFieldRepository,
    CustomFieldStore, EntityRepository, EntityStore, GroupRepository, GroupStore,
    ImportRepository, ImportStore, SearchRepository, SearchStore, SubscriptionRepository,
    SubscriptionStore, ZoneRepository, ZoneStore,
};
use common::{AppError, AppResult};

/// Boxed future returned by transaction closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable through automock because of the generic transaction methods.
/// Tests implement it over mocked repositories instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn zones(&self) -> Arc<dyn ZoneRepository>;

    fn entities(&self) -> Arc<dyn EntityRepository>;

    fn contacts(&self) -> Arc<dyn ContactRepository>;

    fn groups(&self) -> Arc<dyn GroupRepository>;

    fn actions(&self) -> Arc<dyn ActionRepository>;

    fn custom_fields(&self) -> Arc<dyn CustomFieldRepository>;

    fn subscriptions(&self) -> Arc<dyn SubscriptionRepository>;

    fn imports(&self) -> Arc<dyn ImportRepository>;

    /// Contact queries for the search filters
    fn search(&self) -> Arc<dyn SearchRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed on success, rolled back on error. Uses ReadCommitted.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;

    /// Execute a closure within a serializable transaction.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repositories bound to one transaction.
#[derive(Clone, Copy)]
pub struct RepositorySet<'a> {
    pub zones: &'a dyn ZoneRepository,
    pub entities: &'a dyn EntityRepository,
    pub contacts: &'a dyn ContactRepository,
    pub groups: &'a dyn GroupRepository,
    pub actions: &'a dyn ActionRepository,
    pub custom_fields: &'a dyn CustomFieldRepository,
    pub subscriptions: &'a dyn SubscriptionRepository,
    pub imports: &'a dyn ImportRepository,
}

/// Transaction context providing repository access within a transaction.
///
/// Everything done through the context is part of the same transaction.
#[derive(Clone, Copy)]
pub struct TransactionContext<'a> {
    repos: RepositorySet<'a>,
}

impl<'a> TransactionContext<'a> {
    pub fn new(repos: RepositorySet<'a>) -> Self {
        Self { repos }
    }

    /// Every repository of the transaction at once
    pub fn repos(&self) -> RepositorySet<'a> {
        self.repos
    }

    pub fn zones(&self) -> &'a dyn ZoneRepository {
        self.repos.zones
    }

    pub fn entities(&self) -> &'a dyn EntityRepository {
        self.repos.entities
    }

    pub fn contacts(&self) -> &'a dyn ContactRepository {
        self.repos.contacts
    }

    pub fn groups(&self) -> &'a dyn GroupRepository {
        self.repos.groups
    }

    pub fn actions(&self) -> &'a dyn ActionRepository {
        self.repos.actions
    }

    pub fn custom_fields(&self) -> &'a dyn CustomFieldRepository {
        self.repos.custom_fields
    }

    pub fn subscriptions(&self) -> &'a dyn SubscriptionRepository {
        self.repos.subscriptions
    }

    pub fn imports(&self) -> &'a dyn ImportRepository {
        self.repos.imports
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    zones: Arc<ZoneStore>,
    entities: Arc<EntityStore>,
    contacts: Arc<ContactStore>,
    groups: Arc<GroupStore>,
    actions: Arc<ActionStore>,
    custom_fields: Arc<CustomFieldStore>,
    subscriptions: Arc<SubscriptionStore>,
    imports: Arc<ImportStore>,
    search: Arc<SearchStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            zones: Arc::new(ZoneStore::new(db.clone())),
            entities: Arc::new(EntityStore::new(db.clone())),
            contacts: Arc::new(ContactStore::new(db.clone())),
            groups: Arc::new(GroupStore::new(db.clone())),
            actions: Arc::new(ActionStore::new(db.clone())),
            custom_fields: Arc::new(CustomFieldStore::new(db.clone())),
            subscriptions: Arc::new(SubscriptionStore::new(db.clone())),
            imports: Arc::new(ImportStore::new(db.clone())),
            search: Arc::new(SearchStore::new(db.clone())),
            db,
        }
    }

    /// Internal transaction execution with configurable isolation level
    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let outcome = {
            let zones = ZoneStore::new(&txn);
            let entities = EntityStore::new(&txn);
            let contacts = ContactStore::new(&txn);
            let groups = GroupStore::new(&txn);
            let actions = ActionStore::new(&txn);
            let custom_fields = CustomFieldStore::new(&txn);
            let subscriptions = SubscriptionStore::new(&txn);
            let imports = ImportStore::new(&txn);

            let ctx = TransactionContext::new(RepositorySet {
                zones: &zones,
                entities: &entities,
                contacts: &contacts,
                groups: &groups,
                actions: &actions,
                custom_fields: &custom_fields,
                subscriptions: &subscriptions,
                imports: &imports,
            });
            f(ctx).await
        };

        match outcome {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
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
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}


//! Subscription repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::subscription::{subscription, subscription_type};
use super::DbHandle;
use common::{AppError, AppResult};
use domain::{Subscription, SubscriptionType};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// All subscription types, by order index
    async fn list_types(&self) -> AppResult<Vec<SubscriptionType>>;

    async fn find_for_contact(&self, contact_id: Uuid) -> AppResult<Vec<Subscription>>;

    /// Insert or update a subscription
    async fn save(&self, subscription: &Subscription) -> AppResult<Subscription>;
}

/// SeaORM implementation of SubscriptionRepository
pub struct SubscriptionStore<H = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> SubscriptionStore<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<H: DbHandle> SubscriptionRepository for SubscriptionStore<H> {
    async fn list_types(&self) -> AppResult<Vec<SubscriptionType>> {
        let models = subscription_type::Entity::find()
            .order_by_asc(subscription_type::Column::OrderIndex)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(SubscriptionType::from).collect())
    }

    async fn find_for_contact(&self, contact_id: Uuid) -> AppResult<Vec<Subscription>> {
        let models = subscription::Entity::find()
            .filter(subscription::Column::ContactId.eq(contact_id))
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Subscription::from).collect())
    }

    async fn save(&self, crm_subscription: &Subscription) -> AppResult<Subscription> {
        let exists = subscription::Entity::find_by_id(crm_subscription.id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?
            .is_some();

        let active_model = subscription::ActiveModel::from(crm_subscription);
        let model = if exists {
            active_model.update(self.db.conn()).await
        } else {
            active_model.insert(self.db.conn()).await
        }
        .map_err(AppError::from)?;

        Ok(Subscription::from(model))
    }
}

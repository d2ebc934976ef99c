//! Subscription types and per-contact subscriptions.

pub mod subscription_type {
    use sea_orm::entity::prelude::*;

    use domain::SubscriptionType;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "subscription_types")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub order_index: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for SubscriptionType {
        fn from(model: Model) -> Self {
            SubscriptionType {
                id: model.id,
                name: model.name,
                order_index: model.order_index,
            }
        }
    }
}

pub mod subscription {
    use sea_orm::entity::prelude::*;
    use sea_orm::Set;

    use domain::Subscription;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "subscriptions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub contact_id: Uuid,
        pub subscription_type_id: Uuid,
        pub accept_subscription: bool,
        pub subscription_date: Option<DateTimeUtc>,
        pub unsubscription_date: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Subscription {
        fn from(model: Model) -> Self {
            Subscription {
                id: model.id,
                contact_id: model.contact_id,
                subscription_type_id: model.subscription_type_id,
                accept_subscription: model.accept_subscription,
                subscription_date: model.subscription_date,
                unsubscription_date: model.unsubscription_date,
            }
        }
    }

    impl From<&Subscription> for ActiveModel {
        fn from(subscription: &Subscription) -> Self {
            ActiveModel {
                id: Set(subscription.id),
                contact_id: Set(subscription.contact_id),
                subscription_type_id: Set(subscription.subscription_type_id),
                accept_subscription: Set(subscription.accept_subscription),
                subscription_date: Set(subscription.subscription_date),
                unsubscription_date: Set(subscription.unsubscription_date),
            }
        }
    }
}

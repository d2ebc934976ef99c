//! Action types, statuses, actions and opportunities.

pub mod action_type {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "action_types")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub number_auto_generated: bool,
        pub last_number: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl Model {
        pub fn into_domain(self, allowed_status_ids: Vec<Uuid>) -> domain::ActionType {
            domain::ActionType {
                id: self.id,
                name: self.name,
                allowed_status_ids,
                number_auto_generated: self.number_auto_generated,
                last_number: self.last_number,
            }
        }
    }
}

pub mod action_status {
    use sea_orm::entity::prelude::*;

    use domain::ActionStatus;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "action_statuses")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub is_final: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for ActionStatus {
        fn from(model: Model) -> Self {
            ActionStatus {
                id: model.id,
                name: model.name,
                is_final: model.is_final,
            }
        }
    }
}

/// Statuses an action type allows.
pub mod action_type_status {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "action_type_statuses")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub action_type_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub action_status_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod action {
    use sea_orm::entity::prelude::*;
    use sea_orm::Set;

    use domain::{Action, ActionPriority};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "actions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub subject: String,
        pub planned_date: Option<DateTimeUtc>,
        pub end_datetime: Option<DateTimeUtc>,
        pub type_id: Option<Uuid>,
        pub detail: String,
        pub priority: i32,
        pub opportunity_id: Option<Uuid>,
        pub done: bool,
        pub done_date: Option<DateTimeUtc>,
        pub in_charge_id: Option<Uuid>,
        pub archived: bool,
        pub amount: Option<Decimal>,
        pub number: i32,
        pub status_id: Option<Uuid>,
        pub created: DateTimeUtc,
        pub modified: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl Model {
        pub fn into_domain(self, contact_ids: Vec<Uuid>, entity_ids: Vec<Uuid>) -> Action {
            Action {
                id: self.id,
                subject: self.subject,
                planned_date: self.planned_date,
                end_datetime: self.end_datetime,
                type_id: self.type_id,
                detail: self.detail,
                priority: ActionPriority::try_from(self.priority).unwrap_or_default(),
                opportunity_id: self.opportunity_id,
                done: self.done,
                done_date: self.done_date,
                in_charge_id: self.in_charge_id,
                archived: self.archived,
                amount: self.amount,
                number: self.number,
                status_id: self.status_id,
                contact_ids,
                entity_ids,
                created: self.created,
                modified: self.modified,
            }
        }
    }

    impl From<&Action> for ActiveModel {
        fn from(action: &Action) -> Self {
            ActiveModel {
                id: Set(action.id),
                subject: Set(action.subject.clone()),
                planned_date: Set(action.planned_date),
                end_datetime: Set(action.end_datetime),
                type_id: Set(action.type_id),
                detail: Set(action.detail.clone()),
                priority: Set(i32::from(action.priority)),
                opportunity_id: Set(action.opportunity_id),
                done: Set(action.done),
                done_date: Set(action.done_date),
                in_charge_id: Set(action.in_charge_id),
                archived: Set(action.archived),
                amount: Set(action.amount),
                number: Set(action.number),
                status_id: Set(action.status_id),
                created: Set(action.created),
                modified: Set(action.modified),
            }
        }
    }
}

pub mod action_contact {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "action_contacts")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub action_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub contact_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod action_entity {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "action_entities")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub action_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub entity_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod opportunity {
    use sea_orm::entity::prelude::*;

    use domain::Opportunity;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "opportunities")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub entity_id: Option<Uuid>,
        pub name: String,
        pub status_id: Option<Uuid>,
        pub type_id: Option<Uuid>,
        pub detail: String,
        pub amount: Option<Decimal>,
        pub ended: bool,
        pub start_date: Option<Date>,
        pub end_date: Option<Date>,
        pub probability: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Opportunity {
        fn from(model: Model) -> Self {
            Opportunity {
                id: model.id,
                entity_id: model.entity_id,
                name: model.name,
                status_id: model.status_id,
                type_id: model.type_id,
                detail: model.detail,
                amount: model.amount,
                ended: model.ended,
                start_date: model.start_date,
                end_date: model.end_date,
                probability: model.probability,
            }
        }
    }
}

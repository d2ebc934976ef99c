//! Migration: action types, statuses, actions and opportunities.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActionStatuses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ActionStatuses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ActionStatuses::Name).string().not_null())
                    .col(
                        ColumnDef::new(ActionStatuses::IsFinal)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActionTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ActionTypes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ActionTypes::Name).string().not_null())
                    .col(
                        ColumnDef::new(ActionTypes::NumberAutoGenerated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ActionTypes::LastNumber).integer().not_null().default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActionTypeStatuses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ActionTypeStatuses::ActionTypeId).uuid().not_null())
                    .col(ColumnDef::new(ActionTypeStatuses::ActionStatusId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ActionTypeStatuses::ActionTypeId)
                            .col(ActionTypeStatuses::ActionStatusId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ActionTypeStatuses::Table, ActionTypeStatuses::ActionTypeId)
                            .to(ActionTypes::Table, ActionTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ActionTypeStatuses::Table, ActionTypeStatuses::ActionStatusId)
                            .to(ActionStatuses::Table, ActionStatuses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Opportunities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Opportunities::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Opportunities::EntityId).uuid().null())
                    .col(ColumnDef::new(Opportunities::Name).string().not_null())
                    .col(ColumnDef::new(Opportunities::StatusId).uuid().null())
                    .col(ColumnDef::new(Opportunities::TypeId).uuid().null())
                    .col(ColumnDef::new(Opportunities::Detail).text().not_null().default(""))
                    .col(ColumnDef::new(Opportunities::Amount).decimal_len(12, 2).null())
                    .col(ColumnDef::new(Opportunities::Ended).boolean().not_null().default(false))
                    .col(ColumnDef::new(Opportunities::StartDate).date().null())
                    .col(ColumnDef::new(Opportunities::EndDate).date().null())
                    .col(
                        ColumnDef::new(Opportunities::Probability)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_opportunities_entity")
                            .from(Opportunities::Table, Opportunities::EntityId)
                            .to(Entities::Table, Entities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Actions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Actions::Subject).string().not_null().default(""))
                    .col(ColumnDef::new(Actions::PlannedDate).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Actions::EndDatetime).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Actions::TypeId).uuid().null())
                    .col(ColumnDef::new(Actions::Detail).text().not_null().default(""))
                    .col(ColumnDef::new(Actions::Priority).integer().not_null().default(2))
                    .col(ColumnDef::new(Actions::OpportunityId).uuid().null())
                    .col(ColumnDef::new(Actions::Done).boolean().not_null().default(false))
                    .col(ColumnDef::new(Actions::DoneDate).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Actions::InChargeId).uuid().null())
                    .col(ColumnDef::new(Actions::Archived).boolean().not_null().default(false))
                    .col(ColumnDef::new(Actions::Amount).decimal_len(12, 2).null())
                    .col(ColumnDef::new(Actions::Number).integer().not_null().default(0))
                    .col(ColumnDef::new(Actions::StatusId).uuid().null())
                    .col(
                        ColumnDef::new(Actions::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Actions::Modified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actions_type")
                            .from(Actions::Table, Actions::TypeId)
                            .to(ActionTypes::Table, ActionTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actions_status")
                            .from(Actions::Table, Actions::StatusId)
                            .to(ActionStatuses::Table, ActionStatuses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actions_opportunity")
                            .from(Actions::Table, Actions::OpportunityId)
                            .to(Opportunities::Table, Opportunities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActionContacts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ActionContacts::ActionId).uuid().not_null())
                    .col(ColumnDef::new(ActionContacts::ContactId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ActionContacts::ActionId)
                            .col(ActionContacts::ContactId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ActionContacts::Table, ActionContacts::ActionId)
                            .to(Actions::Table, Actions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ActionContacts::Table, ActionContacts::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActionEntities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ActionEntities::ActionId).uuid().not_null())
                    .col(ColumnDef::new(ActionEntities::EntityId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ActionEntities::ActionId)
                            .col(ActionEntities::EntityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ActionEntities::Table, ActionEntities::ActionId)
                            .to(Actions::Table, Actions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ActionEntities::Table, ActionEntities::EntityId)
                            .to(Entities::Table, Entities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActionEntities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActionContacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Actions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Opportunities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActionTypeStatuses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActionTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActionStatuses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ActionStatuses {
    Table,
    Id,
    Name,
    IsFinal,
}

#[derive(Iden)]
enum ActionTypes {
    Table,
    Id,
    Name,
    NumberAutoGenerated,
    LastNumber,
}

#[derive(Iden)]
enum ActionTypeStatuses {
    Table,
    ActionTypeId,
    ActionStatusId,
}

#[derive(Iden)]
enum Opportunities {
    Table,
    Id,
    EntityId,
    Name,
    StatusId,
    TypeId,
    Detail,
    Amount,
    Ended,
    StartDate,
    EndDate,
    Probability,
}

#[derive(Iden)]
enum Actions {
    Table,
    Id,
    Subject,
    PlannedDate,
    EndDatetime,
    TypeId,
    Detail,
    Priority,
    OpportunityId,
    Done,
    DoneDate,
    InChargeId,
    Archived,
    Amount,
    Number,
    StatusId,
    Created,
    Modified,
}

#[derive(Iden)]
enum ActionContacts {
    Table,
    ActionId,
    ContactId,
}

#[derive(Iden)]
enum ActionEntities {
    Table,
    ActionId,
    EntityId,
}

#[derive(Iden)]
enum Entities {
    Table,
    Id,
}

#[derive(Iden)]
enum Contacts {
    Table,
    Id,
}

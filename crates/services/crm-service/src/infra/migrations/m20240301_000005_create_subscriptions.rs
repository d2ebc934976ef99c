//! Migration: subscription types and subscriptions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SubscriptionTypes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SubscriptionTypes::Name).string().not_null())
                    .col(
                        ColumnDef::new(SubscriptionTypes::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subscriptions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Subscriptions::ContactId).uuid().not_null())
                    .col(ColumnDef::new(Subscriptions::SubscriptionTypeId).uuid().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::AcceptSubscription)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::SubscriptionDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::UnsubscriptionDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_contact")
                            .from(Subscriptions::Table, Subscriptions::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_type")
                            .from(Subscriptions::Table, Subscriptions::SubscriptionTypeId)
                            .to(SubscriptionTypes::Table, SubscriptionTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubscriptionTypes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SubscriptionTypes {
    Table,
    Id,
    Name,
    OrderIndex,
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Id,
    ContactId,
    SubscriptionTypeId,
    AcceptSubscription,
    SubscriptionDate,
    UnsubscriptionDate,
}

#[derive(Iden)]
enum Contacts {
    Table,
    Id,
}

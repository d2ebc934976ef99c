//! Migration: custom fields and their values.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CustomFields::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CustomFields::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CustomFields::Model).integer().not_null())
                    .col(ColumnDef::new(CustomFields::Name).string().not_null())
                    .col(ColumnDef::new(CustomFields::Label).string().not_null().default(""))
                    .col(ColumnDef::new(CustomFields::Widget).string().not_null().default(""))
                    .col(ColumnDef::new(CustomFields::Ordering).integer().not_null().default(0))
                    .col(ColumnDef::new(CustomFields::ImportOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(CustomFields::ExportOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(CustomFields::IsLink).boolean().not_null().default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EntityCustomFieldValues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EntityCustomFieldValues::CustomFieldId).uuid().not_null())
                    .col(ColumnDef::new(EntityCustomFieldValues::EntityId).uuid().not_null())
                    .col(ColumnDef::new(EntityCustomFieldValues::Value).text().not_null().default(""))
                    .primary_key(
                        Index::create()
                            .col(EntityCustomFieldValues::CustomFieldId)
                            .col(EntityCustomFieldValues::EntityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EntityCustomFieldValues::Table, EntityCustomFieldValues::CustomFieldId)
                            .to(CustomFields::Table, CustomFields::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EntityCustomFieldValues::Table, EntityCustomFieldValues::EntityId)
                            .to(Entities::Table, Entities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContactCustomFieldValues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ContactCustomFieldValues::CustomFieldId).uuid().not_null())
                    .col(ColumnDef::new(ContactCustomFieldValues::ContactId).uuid().not_null())
                    .col(ColumnDef::new(ContactCustomFieldValues::Value).text().not_null().default(""))
                    .primary_key(
                        Index::create()
                            .col(ContactCustomFieldValues::CustomFieldId)
                            .col(ContactCustomFieldValues::ContactId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ContactCustomFieldValues::Table, ContactCustomFieldValues::CustomFieldId)
                            .to(CustomFields::Table, CustomFields::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ContactCustomFieldValues::Table, ContactCustomFieldValues::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContactCustomFieldValues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EntityCustomFieldValues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CustomFields::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CustomFields {
    Table,
    Id,
    Model,
    Name,
    Label,
    Widget,
    Ordering,
    ImportOrder,
    ExportOrder,
    IsLink,
}

#[derive(Iden)]
enum EntityCustomFieldValues {
    Table,
    CustomFieldId,
    EntityId,
    Value,
}

#[derive(Iden)]
enum ContactCustomFieldValues {
    Table,
    CustomFieldId,
    ContactId,
    Value,
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

//! Migration: contacts import settings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactsImports::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ContactsImports::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ContactsImports::Name).string().not_null())
                    .col(
                        ColumnDef::new(ContactsImports::Encoding)
                            .string()
                            .not_null()
                            .default("utf-8"),
                    )
                    .col(
                        ColumnDef::new(ContactsImports::Separator)
                            .string_len(1)
                            .not_null()
                            .default(","),
                    )
                    .col(ColumnDef::new(ContactsImports::EntityTypeId).uuid().null())
                    .col(
                        ColumnDef::new(ContactsImports::EntityNameFromEmail)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ContactsImports::ImportedBy).uuid().null())
                    .col(
                        ColumnDef::new(ContactsImports::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_imports_entity_type")
                            .from(ContactsImports::Table, ContactsImports::EntityTypeId)
                            .to(EntityTypes::Table, EntityTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContactsImportGroups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ContactsImportGroups::ImportId).uuid().not_null())
                    .col(ColumnDef::new(ContactsImportGroups::GroupId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ContactsImportGroups::ImportId)
                            .col(ContactsImportGroups::GroupId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ContactsImportGroups::Table, ContactsImportGroups::ImportId)
                            .to(ContactsImports::Table, ContactsImports::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ContactsImportGroups::Table, ContactsImportGroups::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContactsImportGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContactsImports::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContactsImports {
    Table,
    Id,
    Name,
    Encoding,
    Separator,
    EntityTypeId,
    EntityNameFromEmail,
    ImportedBy,
    Created,
}

#[derive(Iden)]
enum ContactsImportGroups {
    Table,
    ImportId,
    GroupId,
}

#[derive(Iden)]
enum EntityTypes {
    Table,
    Id,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
}

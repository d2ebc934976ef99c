//! Migration: relationship types and relationships between contacts.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RelationshipTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RelationshipTypes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(RelationshipTypes::Name).string().not_null())
                    .col(ColumnDef::new(RelationshipTypes::Reverse).string().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Relationships::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Relationships::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Relationships::RelationshipTypeId).uuid().not_null())
                    .col(ColumnDef::new(Relationships::Contact1Id).uuid().not_null())
                    .col(ColumnDef::new(Relationships::Contact2Id).uuid().not_null())
                    .col(
                        ColumnDef::new(Relationships::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationships_type")
                            .from(Relationships::Table, Relationships::RelationshipTypeId)
                            .to(RelationshipTypes::Table, RelationshipTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationships_contact1")
                            .from(Relationships::Table, Relationships::Contact1Id)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationships_contact2")
                            .from(Relationships::Table, Relationships::Contact2Id)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Relationships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RelationshipTypes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RelationshipTypes {
    Table,
    Id,
    Name,
    Reverse,
}

#[derive(Iden)]
enum Relationships {
    Table,
    Id,
    RelationshipTypeId,
    #[iden = "contact1_id"]
    Contact1Id,
    #[iden = "contact2_id"]
    Contact2Id,
    Created,
}

#[derive(Iden)]
enum Contacts {
    Table,
    Id,
}

//! Migration: zones, cities and their groups.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Zones::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Zones::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Zones::Name).string().not_null())
                    .col(ColumnDef::new(Zones::Code).string().not_null().default(""))
                    .col(ColumnDef::new(Zones::ZoneType).string().not_null())
                    .col(ColumnDef::new(Zones::ParentId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_zones_parent")
                            .from(Zones::Table, Zones::ParentId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_zones_code")
                    .table(Zones::Table)
                    .col(Zones::Code)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ZoneGroups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ZoneGroups::ZoneId).uuid().not_null())
                    .col(ColumnDef::new(ZoneGroups::GroupId).uuid().not_null())
                    .primary_key(Index::create().col(ZoneGroups::ZoneId).col(ZoneGroups::GroupId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(ZoneGroups::Table, ZoneGroups::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ZoneGroups::Table, ZoneGroups::GroupId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cities::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cities::Name).string().not_null())
                    .col(ColumnDef::new(Cities::ParentId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cities_parent")
                            .from(Cities::Table, Cities::ParentId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CityGroups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CityGroups::CityId).uuid().not_null())
                    .col(ColumnDef::new(CityGroups::ZoneId).uuid().not_null())
                    .primary_key(Index::create().col(CityGroups::CityId).col(CityGroups::ZoneId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(CityGroups::Table, CityGroups::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CityGroups::Table, CityGroups::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CityGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ZoneGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Zones::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Zones {
    Table,
    Id,
    Name,
    Code,
    ZoneType,
    ParentId,
}

#[derive(Iden)]
enum ZoneGroups {
    Table,
    ZoneId,
    GroupId,
}

#[derive(Iden)]
enum Cities {
    Table,
    Id,
    Name,
    ParentId,
}

#[derive(Iden)]
enum CityGroups {
    Table,
    CityId,
    ZoneId,
}

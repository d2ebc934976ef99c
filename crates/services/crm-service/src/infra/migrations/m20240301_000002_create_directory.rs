//! Migration: entities, contacts, roles, same-as links and groups.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EntityTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EntityTypes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(EntityTypes::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EntityRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EntityRoles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(EntityRoles::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Entities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Entities::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Entities::Name).string().not_null())
                    .col(ColumnDef::new(Entities::Description).string().not_null().default(""))
                    .col(ColumnDef::new(Entities::EntityTypeId).uuid().null())
                    .col(ColumnDef::new(Entities::RelationshipDate).date().null())
                    .col(ColumnDef::new(Entities::Phone).string().not_null().default(""))
                    .col(ColumnDef::new(Entities::Fax).string().not_null().default(""))
                    .col(ColumnDef::new(Entities::Email).string().not_null().default(""))
                    .col(ColumnDef::new(Entities::Website).string().not_null().default(""))
                    .col(ColumnDef::new(Entities::Notes).text().not_null().default(""))
                    .col(ColumnDef::new(Entities::Address).string().not_null().default(""))
                    .col(ColumnDef::new(Entities::Address2).string().not_null().default(""))
                    .col(ColumnDef::new(Entities::Address3).string().not_null().default(""))
                    .col(ColumnDef::new(Entities::ZipCode).string().not_null().default(""))
                    .col(ColumnDef::new(Entities::Cedex).string().not_null().default(""))
                    .col(ColumnDef::new(Entities::CityId).uuid().null())
                    .col(ColumnDef::new(Entities::ImportedBy).uuid().null())
                    .col(
                        ColumnDef::new(Entities::IsSingleContact)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Entities::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Entities::Modified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Entities::CreatedBy).uuid().null())
                    .col(ColumnDef::new(Entities::LastModifiedBy).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entities_type")
                            .from(Entities::Table, Entities::EntityTypeId)
                            .to(EntityTypes::Table, EntityTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entities_city")
                            .from(Entities::Table, Entities::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SameAs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SameAs::Id).uuid().not_null().primary_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Contacts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Contacts::EntityId).uuid().not_null())
                    .col(ColumnDef::new(Contacts::Gender).integer().not_null().default(0))
                    .col(ColumnDef::new(Contacts::GenderTitle).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::Title).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::Lastname).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::Firstname).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::Nickname).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::BirthDate).date().null())
                    .col(ColumnDef::new(Contacts::Job).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::MainContact).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Contacts::AcceptNotifications)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Contacts::EmailVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Contacts::Phone).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::Mobile).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::Email).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::Notes).text().not_null().default(""))
                    .col(ColumnDef::new(Contacts::SameAsId).uuid().null())
                    .col(ColumnDef::new(Contacts::SameAsPriority).integer().not_null().default(0))
                    .col(ColumnDef::new(Contacts::HasLeft).boolean().not_null().default(false))
                    .col(ColumnDef::new(Contacts::ImportedBy).uuid().null())
                    .col(
                        ColumnDef::new(Contacts::FavoriteLanguage)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Contacts::Address).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::Address2).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::Address3).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::ZipCode).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::Cedex).string().not_null().default(""))
                    .col(ColumnDef::new(Contacts::CityId).uuid().null())
                    .col(
                        ColumnDef::new(Contacts::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Contacts::Modified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Contacts::CreatedBy).uuid().null())
                    .col(ColumnDef::new(Contacts::LastModifiedBy).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_entity")
                            .from(Contacts::Table, Contacts::EntityId)
                            .to(Entities::Table, Entities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_same_as")
                            .from(Contacts::Table, Contacts::SameAsId)
                            .to(SameAs::Table, SameAs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_city")
                            .from(Contacts::Table, Contacts::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contacts_email")
                    .table(Contacts::Table)
                    .col(Contacts::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContactRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ContactRoles::ContactId).uuid().not_null())
                    .col(ColumnDef::new(ContactRoles::RoleId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ContactRoles::ContactId)
                            .col(ContactRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ContactRoles::Table, ContactRoles::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ContactRoles::Table, ContactRoles::RoleId)
                            .to(EntityRoles::Table, EntityRoles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Groups::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Groups::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Groups::Description).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Groups::SubscribeForm)
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
                    .table(GroupEntities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroupEntities::GroupId).uuid().not_null())
                    .col(ColumnDef::new(GroupEntities::EntityId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(GroupEntities::GroupId)
                            .col(GroupEntities::EntityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupEntities::Table, GroupEntities::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupEntities::Table, GroupEntities::EntityId)
                            .to(Entities::Table, Entities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GroupContacts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroupContacts::GroupId).uuid().not_null())
                    .col(ColumnDef::new(GroupContacts::ContactId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(GroupContacts::GroupId)
                            .col(GroupContacts::ContactId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupContacts::Table, GroupContacts::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupContacts::Table, GroupContacts::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Tables::GroupContacts,
            Tables::GroupEntities,
            Tables::Groups,
            Tables::ContactRoles,
            Tables::Contacts,
            Tables::SameAs,
            Tables::Entities,
            Tables::EntityRoles,
            Tables::EntityTypes,
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

/// Table names, in drop order.
#[derive(Iden)]
enum Tables {
    GroupContacts,
    GroupEntities,
    Groups,
    ContactRoles,
    Contacts,
    SameAs,
    Entities,
    EntityRoles,
    EntityTypes,
}

#[derive(Iden)]
enum EntityTypes {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum EntityRoles {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Entities {
    Table,
    Id,
    Name,
    Description,
    EntityTypeId,
    RelationshipDate,
    Phone,
    Fax,
    Email,
    Website,
    Notes,
    Address,
    Address2,
    Address3,
    ZipCode,
    Cedex,
    CityId,
    ImportedBy,
    IsSingleContact,
    Created,
    Modified,
    CreatedBy,
    LastModifiedBy,
}

#[derive(Iden)]
enum SameAs {
    Table,
    Id,
}

#[derive(Iden)]
enum Contacts {
    Table,
    Id,
    EntityId,
    Gender,
    GenderTitle,
    Title,
    Lastname,
    Firstname,
    Nickname,
    BirthDate,
    Job,
    MainContact,
    AcceptNotifications,
    EmailVerified,
    Phone,
    Mobile,
    Email,
    Notes,
    SameAsId,
    SameAsPriority,
    HasLeft,
    ImportedBy,
    FavoriteLanguage,
    Address,
    Address2,
    Address3,
    ZipCode,
    Cedex,
    CityId,
    Created,
    Modified,
    CreatedBy,
    LastModifiedBy,
}

#[derive(Iden)]
enum ContactRoles {
    Table,
    ContactId,
    RoleId,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    Name,
    Description,
    SubscribeForm,
}

#[derive(Iden)]
enum GroupEntities {
    Table,
    GroupId,
    EntityId,
}

#[derive(Iden)]
enum GroupContacts {
    Table,
    GroupId,
    ContactId,
}

#[derive(Iden)]
enum Cities {
    Table,
    Id,
}

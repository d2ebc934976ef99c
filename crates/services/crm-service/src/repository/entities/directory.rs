//! Entities, contacts, roles, same-as links and groups.

pub mod entity_type {
    use sea_orm::entity::prelude::*;

    use domain::EntityType;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "entity_types")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for EntityType {
        fn from(model: Model) -> Self {
            EntityType {
                id: model.id,
                name: model.name,
            }
        }
    }
}

pub mod entity_role {
    use sea_orm::entity::prelude::*;

    use domain::EntityRole;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "entity_roles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for EntityRole {
        fn from(model: Model) -> Self {
            EntityRole {
                id: model.id,
                name: model.name,
            }
        }
    }
}

pub mod entity {
    use sea_orm::entity::prelude::*;
    use sea_orm::Set;

    use domain::{Audit, Entity as CrmEntity, PostalAddress};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "entities")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub description: String,
        pub entity_type_id: Option<Uuid>,
        pub relationship_date: Option<Date>,
        pub phone: String,
        pub fax: String,
        pub email: String,
        pub website: String,
        pub notes: String,
        pub address: String,
        pub address2: String,
        pub address3: String,
        pub zip_code: String,
        pub cedex: String,
        pub city_id: Option<Uuid>,
        pub imported_by: Option<Uuid>,
        pub is_single_contact: bool,
        pub created: DateTimeUtc,
        pub modified: DateTimeUtc,
        pub created_by: Option<Uuid>,
        pub last_modified_by: Option<Uuid>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for CrmEntity {
        fn from(model: Model) -> Self {
            CrmEntity {
                id: model.id,
                name: model.name,
                description: model.description,
                entity_type_id: model.entity_type_id,
                relationship_date: model.relationship_date,
                phone: model.phone,
                fax: model.fax,
                email: model.email,
                website: model.website,
                notes: model.notes,
                postal: PostalAddress {
                    address: model.address,
                    address2: model.address2,
                    address3: model.address3,
                    zip_code: model.zip_code,
                    cedex: model.cedex,
                    city_id: model.city_id,
                },
                imported_by: model.imported_by,
                is_single_contact: model.is_single_contact,
                audit: Audit {
                    created: model.created,
                    modified: model.modified,
                    created_by: model.created_by,
                    last_modified_by: model.last_modified_by,
                },
            }
        }
    }

    impl From<&CrmEntity> for ActiveModel {
        fn from(entity: &CrmEntity) -> Self {
            ActiveModel {
                id: Set(entity.id),
                name: Set(entity.name.clone()),
                description: Set(entity.description.clone()),
                entity_type_id: Set(entity.entity_type_id),
                relationship_date: Set(entity.relationship_date),
                phone: Set(entity.phone.clone()),
                fax: Set(entity.fax.clone()),
                email: Set(entity.email.clone()),
                website: Set(entity.website.clone()),
                notes: Set(entity.notes.clone()),
                address: Set(entity.postal.address.clone()),
                address2: Set(entity.postal.address2.clone()),
                address3: Set(entity.postal.address3.clone()),
                zip_code: Set(entity.postal.zip_code.clone()),
                cedex: Set(entity.postal.cedex.clone()),
                city_id: Set(entity.postal.city_id),
                imported_by: Set(entity.imported_by),
                is_single_contact: Set(entity.is_single_contact),
                created: Set(entity.audit.created),
                modified: Set(entity.audit.modified),
                created_by: Set(entity.audit.created_by),
                last_modified_by: Set(entity.audit.last_modified_by),
            }
        }
    }
}

pub mod contact {
    use sea_orm::entity::prelude::*;
    use sea_orm::Set;

    use domain::{Audit, Contact, Gender, PostalAddress};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "contacts")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub entity_id: Uuid,
        pub gender: i32,
        pub gender_title: String,
        pub title: String,
        pub lastname: String,
        pub firstname: String,
        pub nickname: String,
        pub birth_date: Option<Date>,
        pub job: String,
        pub main_contact: bool,
        pub accept_notifications: bool,
        pub email_verified: bool,
        pub phone: String,
        pub mobile: String,
        pub email: String,
        pub notes: String,
        pub same_as_id: Option<Uuid>,
        pub same_as_priority: i32,
        pub has_left: bool,
        pub imported_by: Option<Uuid>,
        pub favorite_language: String,
        pub address: String,
        pub address2: String,
        pub address3: String,
        pub zip_code: String,
        pub cedex: String,
        pub city_id: Option<Uuid>,
        pub created: DateTimeUtc,
        pub modified: DateTimeUtc,
        pub created_by: Option<Uuid>,
        pub last_modified_by: Option<Uuid>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    /// Role ids are stored apart; the store fills them.
    impl From<Model> for Contact {
        fn from(model: Model) -> Self {
            Contact {
                id: model.id,
                entity_id: model.entity_id,
                gender: Gender::try_from(model.gender).unwrap_or_default(),
                gender_title: model.gender_title,
                title: model.title,
                lastname: model.lastname,
                firstname: model.firstname,
                nickname: model.nickname,
                birth_date: model.birth_date,
                job: model.job,
                main_contact: model.main_contact,
                accept_notifications: model.accept_notifications,
                email_verified: model.email_verified,
                phone: model.phone,
                mobile: model.mobile,
                email: model.email,
                notes: model.notes,
                same_as_id: model.same_as_id,
                same_as_priority: model.same_as_priority,
                has_left: model.has_left,
                imported_by: model.imported_by,
                favorite_language: model.favorite_language,
                postal: PostalAddress {
                    address: model.address,
                    address2: model.address2,
                    address3: model.address3,
                    zip_code: model.zip_code,
                    cedex: model.cedex,
                    city_id: model.city_id,
                },
                role_ids: Vec::new(),
                audit: Audit {
                    created: model.created,
                    modified: model.modified,
                    created_by: model.created_by,
                    last_modified_by: model.last_modified_by,
                },
            }
        }
    }

    impl From<&Contact> for ActiveModel {
        fn from(contact: &Contact) -> Self {
            ActiveModel {
                id: Set(contact.id),
                entity_id: Set(contact.entity_id),
                gender: Set(i32::from(contact.gender)),
                gender_title: Set(contact.gender_title.clone()),
                title: Set(contact.title.clone()),
                lastname: Set(contact.lastname.clone()),
                firstname: Set(contact.firstname.clone()),
                nickname: Set(contact.nickname.clone()),
                birth_date: Set(contact.birth_date),
                job: Set(contact.job.clone()),
                main_contact: Set(contact.main_contact),
                accept_notifications: Set(contact.accept_notifications),
                email_verified: Set(contact.email_verified),
                phone: Set(contact.phone.clone()),
                mobile: Set(contact.mobile.clone()),
                email: Set(contact.email.clone()),
                notes: Set(contact.notes.clone()),
                same_as_id: Set(contact.same_as_id),
                same_as_priority: Set(contact.same_as_priority),
                has_left: Set(contact.has_left),
                imported_by: Set(contact.imported_by),
                favorite_language: Set(contact.favorite_language.clone()),
                address: Set(contact.postal.address.clone()),
                address2: Set(contact.postal.address2.clone()),
                address3: Set(contact.postal.address3.clone()),
                zip_code: Set(contact.postal.zip_code.clone()),
                cedex: Set(contact.postal.cedex.clone()),
                city_id: Set(contact.postal.city_id),
                created: Set(contact.audit.created),
                modified: Set(contact.audit.modified),
                created_by: Set(contact.audit.created_by),
                last_modified_by: Set(contact.audit.last_modified_by),
            }
        }
    }
}

pub mod contact_role {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "contact_roles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub contact_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub role_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Link row shared by contacts describing the same person.
pub mod same_as {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "same_as")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod group {
    use sea_orm::entity::prelude::*;

    use domain::Group;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "groups")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub name: String,
        pub description: String,
        pub subscribe_form: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Group {
        fn from(model: Model) -> Self {
            Group {
                id: model.id,
                name: model.name,
                description: model.description,
                subscribe_form: model.subscribe_form,
                entity_ids: Vec::new(),
                contact_ids: Vec::new(),
            }
        }
    }
}

pub mod group_entity {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "group_entities")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub group_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub entity_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod group_contact {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "group_contacts")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub group_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub contact_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

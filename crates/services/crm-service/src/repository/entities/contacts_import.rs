//! Uploaded contact import settings.

pub mod contacts_import {
    use sea_orm::entity::prelude::*;

    use domain::{ContactsImport, ImportEncoding};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "contacts_imports")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub encoding: String,
        pub separator: String,
        pub entity_type_id: Option<Uuid>,
        pub entity_name_from_email: bool,
        pub imported_by: Option<Uuid>,
        pub created: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl Model {
        /// Unknown encodings read as UTF-8.
        pub fn into_domain(self, group_ids: Vec<Uuid>) -> ContactsImport {
            ContactsImport {
                id: self.id,
                name: self.name,
                encoding: self.encoding.parse::<ImportEncoding>().unwrap_or_default(),
                separator: self.separator,
                entity_type_id: self.entity_type_id,
                group_ids,
                entity_name_from_email: self.entity_name_from_email,
                imported_by: self.imported_by,
                created: self.created,
            }
        }
    }
}

/// Groups every contact of an import joins.
pub mod contacts_import_group {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "contacts_import_groups")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub import_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub group_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

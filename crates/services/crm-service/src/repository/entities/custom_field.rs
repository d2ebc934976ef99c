//! Custom field definitions and their entity/contact values.

pub mod custom_field {
    use sea_orm::entity::prelude::*;

    use domain::{CustomField, CustomFieldModel};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "custom_fields")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub model: i32,
        pub name: String,
        pub label: String,
        pub widget: String,
        pub ordering: i32,
        pub import_order: i32,
        pub export_order: i32,
        pub is_link: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for CustomField {
        fn from(model: Model) -> Self {
            CustomField {
                id: model.id,
                model: CustomFieldModel::try_from(model.model).unwrap_or(CustomFieldModel::Contact),
                name: model.name,
                label: model.label,
                widget: model.widget,
                ordering: model.ordering,
                import_order: model.import_order,
                export_order: model.export_order,
                is_link: model.is_link,
            }
        }
    }
}

pub mod entity_custom_field_value {
    use sea_orm::entity::prelude::*;

    use domain::CustomFieldValue;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "entity_custom_field_values")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub custom_field_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub entity_id: Uuid,
        pub value: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for CustomFieldValue {
        fn from(model: Model) -> Self {
            CustomFieldValue {
                custom_field_id: model.custom_field_id,
                owner_id: model.entity_id,
                value: model.value,
            }
        }
    }
}

pub mod contact_custom_field_value {
    use sea_orm::entity::prelude::*;

    use domain::CustomFieldValue;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "contact_custom_field_values")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub custom_field_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub contact_id: Uuid,
        pub value: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for CustomFieldValue {
        fn from(model: Model) -> Self {
            CustomFieldValue {
                custom_field_id: model.custom_field_id,
                owner_id: model.contact_id,
                value: model.value,
            }
        }
    }
}

//! Typed links between contacts.

pub mod relationship_type {
    use sea_orm::entity::prelude::*;

    use domain::RelationshipType;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "relationship_types")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub reverse: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for RelationshipType {
        fn from(model: Model) -> Self {
            RelationshipType {
                id: model.id,
                name: model.name,
                reverse: model.reverse,
            }
        }
    }
}

pub mod relationship {
    use sea_orm::entity::prelude::*;

    use domain::Relationship;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "relationships")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub relationship_type_id: Uuid,
        pub contact1_id: Uuid,
        pub contact2_id: Uuid,
        pub created: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Relationship {
        fn from(model: Model) -> Self {
            Relationship {
                id: model.id,
                relationship_type_id: model.relationship_type_id,
                contact1_id: model.contact1_id,
                contact2_id: model.contact2_id,
                created: model.created,
            }
        }
    }
}

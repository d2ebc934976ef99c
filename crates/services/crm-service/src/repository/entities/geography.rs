//! Zones, cities and their group memberships.

pub mod zone {
    use sea_orm::entity::prelude::*;

    use domain::{Zone, ZoneType};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "zones")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub code: String,
        pub zone_type: String,
        pub parent_id: Option<Uuid>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    /// Group ids are stored apart; callers fill them when needed.
    impl From<Model> for Zone {
        fn from(model: Model) -> Self {
            Zone {
                id: model.id,
                name: model.name,
                code: model.code,
                zone_type: ZoneType::from(model.zone_type),
                parent_id: model.parent_id,
                group_ids: Vec::new(),
            }
        }
    }
}

/// Membership of a zone in a grouping zone (e.g. a large region).
pub mod zone_group {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "zone_groups")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub zone_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub group_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod city {
    use sea_orm::entity::prelude::*;

    use domain::City;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "cities")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub parent_id: Option<Uuid>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for City {
        fn from(model: Model) -> Self {
            City {
                id: model.id,
                name: model.name,
                parent_id: model.parent_id,
                group_ids: Vec::new(),
            }
        }
    }
}

pub mod city_group {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "city_groups")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub city_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub zone_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

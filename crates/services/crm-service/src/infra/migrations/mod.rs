//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240301_000001_create_geography;
mod m20240301_000002_create_directory;
mod m20240301_000003_create_activity;
mod m20240301_000004_create_custom_fields;
mod m20240301_000005_create_subscriptions;
mod m20240301_000006_create_relationships;
mod m20240301_000007_create_contacts_imports;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_geography::Migration),
            Box::new(m20240301_000002_create_directory::Migration),
            Box::new(m20240301_000003_create_activity::Migration),
            Box::new(m20240301_000004_create_custom_fields::Migration),
            Box::new(m20240301_000005_create_subscriptions::Migration),
            Box::new(m20240301_000006_create_relationships::Migration),
            Box::new(m20240301_000007_create_contacts_imports::Migration),
        ]
    }
}

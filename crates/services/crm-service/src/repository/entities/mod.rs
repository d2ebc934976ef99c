//! SeaORM database entities, grouped by area.

pub mod activity;
pub mod contacts_import;
pub mod custom_field;
pub mod directory;
pub mod geography;
pub mod relationship;
pub mod subscription;

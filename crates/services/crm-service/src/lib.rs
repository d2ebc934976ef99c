//! CRM Service Library
//!
//! Contacts, entities and their activity: city resolution, dynamic search,
//! contact imports and action bookkeeping. The gateway embeds it as a
//! library; the `crm-service` binary drives it from the command line.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use tracing::info;

use crate::config::CrmServiceConfig;
use crate::infra::Database;
use crate::service::Services;

/// Connect to the database, apply pending migrations and build the services.
pub async fn connect_services(config: &CrmServiceConfig) -> Result<Services, Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    Ok(Services::from_connection(
        db.get_connection(),
        config.settings.clone(),
    ))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = CrmServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

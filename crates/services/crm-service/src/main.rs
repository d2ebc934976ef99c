//! CRM Service - command line access to migrations, imports and search.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crm_service_lib::config::CrmServiceConfig;
use crm_service_lib::service::{SearchRequest, ServiceContainer};
use crm_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "crm-service")]
#[command(about = "Contacts and entities CRM")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Contact import commands
    Import {
        #[command(subcommand)]
        action: ImportCommands,
    },
    /// Run a search and print the matching contacts as JSON
    Search {
        /// JSON object: `{"params": {"gr0-_-city-_-0": ["<uuid>"]}, "excluded": []}`
        request: String,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum ImportCommands {
    /// Print the header line of a blank import file
    Template,
    /// Parse a file and flag existing records
    Preview { import_id: Uuid, file: PathBuf },
    /// Import a file
    Confirm {
        import_id: Uuid,
        file: PathBuf,
        /// Department code for new cities without a usable zip code
        #[arg(long, default_value = "")]
        default_department: String,
    },
    /// Unsubscribe every email listed in the file
    Unsubscribe { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            crm_service_lib::run_migrations(migrate_action).await?;
        }
        Commands::Import { action } => {
            let services = crm_service_lib::connect_services(&CrmServiceConfig::from_env()).await?;
            let imports = services.imports();
            match action {
                ImportCommands::Template => print!("{}", imports.template().await?),
                ImportCommands::Preview { import_id, file } => {
                    let preview = imports.preview(import_id, std::fs::read(file)?).await?;
                    println!("{}", serde_json::to_string_pretty(&preview)?);
                }
                ImportCommands::Confirm {
                    import_id,
                    file,
                    default_department,
                } => {
                    let count = imports
                        .confirm(import_id, std::fs::read(file)?, default_department)
                        .await?;
                    println!("{} contacts imported", count);
                }
                ImportCommands::Unsubscribe { file } => {
                    let count = imports.unsubscribe(std::fs::read(file)?).await?;
                    println!("{} contacts unsubscribed", count);
                }
            }
        }
        Commands::Search { request } => {
            let request: SearchRequest = serde_json::from_str(&request)?;
            let services = crm_service_lib::connect_services(&CrmServiceConfig::from_env()).await?;
            let contacts = services.search().search_contacts(request).await?;
            println!("{}", serde_json::to_string_pretty(&contacts)?);
        }
    }

    Ok(())
}

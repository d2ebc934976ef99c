//! API Gateway - HTTP REST API for the CRM.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::config::GatewayConfig;

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "HTTP API for the Sanza CRM")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Overrides GATEWAY_HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides GATEWAY_PORT
        #[arg(long)]
        port: Option<u16>,
    },
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
    let mut config = GatewayConfig::from_env();

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            gateway_lib::run_server(config).await?;
        }
    }

    Ok(())
}

//! API Gateway Library
//!
//! This crate exposes the CRM services over an HTTP REST API.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Connect the CRM services and serve the HTTP API until shutdown.
pub async fn run_server(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let services = crm_service_lib::connect_services(&config.crm).await?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = AppState::new(Arc::new(services), config);

    let app = create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

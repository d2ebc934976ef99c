//! Application state for dependency injection.

use std::sync::Arc;

use crm_service_lib::service::ServiceContainer;

use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Create new app state.
    pub fn new(services: Arc<dyn ServiceContainer>, config: GatewayConfig) -> Self {
        Self {
            services,
            config: Arc::new(config),
        }
    }
}

//! Gateway configuration.

use std::env;

use crm_service_lib::config::CrmServiceConfig;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Largest accepted import upload, in bytes
    pub max_upload_bytes: usize,
    /// Database and CRM feature flags
    pub crm: CrmServiceConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("GATEWAY_HOST").unwrap_or(defaults.host),
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            max_upload_bytes: env::var("GATEWAY_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            crm: CrmServiceConfig::from_env(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_bytes: 10 * 1024 * 1024,
            crm: CrmServiceConfig::default(),
        }
    }
}

//! CRM service configuration.

use common::{CrmSettings, DatabaseConfig};

/// CRM service configuration.
#[derive(Debug, Clone, Default)]
pub struct CrmServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Business feature flags
    pub settings: CrmSettings,
}

impl CrmServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env(),
            settings: CrmSettings::from_env(),
        }
    }
}

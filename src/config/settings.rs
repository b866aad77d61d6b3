use serde::{Deserialize, Serialize};

use config::{Config, ConfigError, Environment};

#[derive(Debug, Clone)]
pub enum StorageType {
    Memory,
}

/// Storage Configuration.
pub struct StorageConfig {
    pub storage_type: StorageType,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    /// Address for the external HTTP layer to bind to.
    pub listen_address: String,
    /// Default number of results for nearby queries.
    pub default_limit: usize,
    /// Log level filter, e.g. "info" or "geodex=debug".
    pub log_level: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            // Adding default values
            .set_default("listen_address", "127.0.0.1:3000")?
            .set_default("default_limit", 5)?
            .set_default("log_level", "info")?
            // Add environment variables with the GEODEX_ prefix
            .add_source(Environment::with_prefix("GEODEX"))
            .build()?;

        // Deserialize the configuration into our structure.
        cfg.try_deserialize()
    }
}

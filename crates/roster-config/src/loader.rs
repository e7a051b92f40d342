//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use roster_core::RosterError;
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable that selects the `{environment}.toml` layer.
pub const ENVIRONMENT_VAR: &str = "ROSTER_ENVIRONMENT";

/// Prefix of environment variable overrides, e.g. `ROSTER__DATABASE__URL`.
pub const ENV_PREFIX: &str = "ROSTER";

/// Configuration loader with layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `ROSTER__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, RosterError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        Self::for_environment(config_dir, environment)
    }

    /// Creates a loader for an explicit environment name.
    pub fn for_environment(
        config_dir: impl Into<String>,
        environment: impl Into<String>,
    ) -> Result<Self, RosterError> {
        let config = Self::load_config(&config_dir.into(), &environment.into())?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, RosterError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    fn load_config(config_dir: &str, environment: &str) -> Result<AppConfig, RosterError> {
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for layer in ["default", environment, "local"] {
            let path = format!("{}/{}.toml", config_dir, layer);
            if Path::new(&path).exists() {
                debug!("Loading {} config from: {}", layer, path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_roster_error)?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_roster_error)?;

        if app_config.app.environment != environment {
            debug!(
                "Environment from files ({}) replaced by selected environment ({})",
                app_config.app.environment, environment
            );
            app_config.app.environment = environment.to_string();
        }

        validate_config(&app_config)?;

        Ok(app_config)
    }
}

/// Validates a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), RosterError> {
    if config.database.url.trim().is_empty() {
        return Err(RosterError::Configuration("Database URL is required".to_string()));
    }

    if config.database.max_connections == 0 {
        return Err(RosterError::Configuration(
            "database.max_connections must be at least 1".to_string(),
        ));
    }

    if config.database.min_connections > config.database.max_connections {
        return Err(RosterError::Configuration(format!(
            "database.min_connections ({}) exceeds max_connections ({})",
            config.database.min_connections, config.database.max_connections
        )));
    }

    if !matches!(
        config.observability.log_format.to_ascii_lowercase().as_str(),
        "json" | "pretty"
    ) {
        return Err(RosterError::Configuration(format!(
            "Unknown log format: {}",
            config.observability.log_format
        )));
    }

    if config.database.is_in_memory() && config.database.max_connections > 1 {
        warn!("In-memory database requested; the pool will be limited to one connection");
    }

    Ok(())
}

fn config_error_to_roster_error(err: ConfigError) -> RosterError {
    RosterError::Configuration(err.to_string())
}

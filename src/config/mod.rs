//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MP_RELAY` prefix and nested values use double underscores as separators.
//! The conventional flat variables (`PORT`, `PROVIDER_ACCESS_TOKEN`, ...) are
//! applied on top as overrides.
//!
//! # Example
//!
//! ```no_run
//! use mp_entitlement_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod error;
mod provider;
mod server;
mod store;

pub use error::{ConfigError, ValidationError};
pub use provider::ProviderConfig;
pub use server::{Environment, ServerConfig};
pub use store::StoreConfig;

use serde::Deserialize;

/// Flat environment variables and the configuration keys they override.
const FLAT_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("APP_ENV", "server.environment"),
    ("PROVIDER_ACCESS_TOKEN", "provider.access_token"),
    ("WEBHOOK_SHARED_SECRET", "provider.webhook_secret"),
    ("PROVIDER_API_BASE_URL", "provider.api_base_url"),
    ("DATABASE_URL", "store.database_url"),
];

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
/// Every section has defaults, so an empty environment yields a runnable
/// development configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment provider configuration (Mercado Pago)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// User store configuration (PostgreSQL)
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MP_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Applies the flat variables in [`FLAT_OVERRIDES`]
    /// 5. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MP_RELAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PORT=8080` -> `server.port = 8080` (wins over the prefixed form)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder().add_source(
            config::Environment::default()
                .prefix("MP_RELAY")
                .separator("__"),
        );
        for (var, key) in FLAT_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Bind address and port
    /// - URL formats
    /// - Pool size constraints
    /// - Production-specific requirements (HTTPS, database)
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.provider.validate(&self.server.environment)?;
        self.store.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

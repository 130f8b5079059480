//! User store configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// User store configuration (PostgreSQL)
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// PostgreSQL connection URL; the in-memory store is used when unset
    /// outside production
    pub database_url: Option<SecretString>,

    /// Maximum connections allowed
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

impl StoreConfig {
    /// Connection URL, treating an empty value as absent
    pub fn database_url(&self) -> Option<&SecretString> {
        self.database_url
            .as_ref()
            .filter(|url| !url.expose_secret().is_empty())
    }

    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Validate store configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        match self.database_url() {
            Some(url) => {
                let url = url.expose_secret();
                if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                    return Err(ValidationError::InvalidDatabaseUrl);
                }
            }
            None if *environment == Environment::Production => {
                return Err(ValidationError::MissingRequired("DATABASE_URL"));
            }
            None => {}
        }
        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(ValidationError::InvalidPoolSize);
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> StoreConfig {
        StoreConfig {
            database_url: Some(SecretString::new(url.to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert!(config.database_url().is_none());
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_database_url_optional_outside_production() {
        assert!(StoreConfig::default()
            .validate(&Environment::Development)
            .is_ok());
        assert_eq!(
            StoreConfig::default().validate(&Environment::Production),
            Err(ValidationError::MissingRequired("DATABASE_URL"))
        );
    }

    #[test]
    fn test_validation_invalid_url() {
        assert_eq!(
            with_url("mysql://localhost/db").validate(&Environment::Development),
            Err(ValidationError::InvalidDatabaseUrl)
        );
        assert!(with_url("postgresql://localhost/db")
            .validate(&Environment::Production)
            .is_ok());
    }

    #[test]
    fn test_validation_pool_size() {
        let config = StoreConfig {
            max_connections: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidPoolSize)
        );

        let config = StoreConfig {
            max_connections: 101,
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidPoolSize)
        );
    }
}

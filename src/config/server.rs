//! Listener and process settings

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

use super::error::ValidationError;

/// Where the relay listens and how it logs.
///
/// Every field has a default, so an empty environment yields a usable
/// development listener on `0.0.0.0:3000`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,

    /// Comma-separated allow-list; any origin when unset
    pub cors_origins: Option<String>,
}

/// Deployment stage, read from `APP_ENV`
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// `host` must be a literal IP address; names are not resolved.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ValidationError::InvalidBindAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Blank entries between commas are skipped.
    pub fn cors_origins_list(&self) -> Vec<String> {
        let Some(raw) = &self.cors_origins else {
            return Vec::new();
        };
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr().map(|_| ())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: Environment::Development,
            log_level: "info,mp_entitlement_relay=debug,sqlx=warn".to_string(),
            cors_origins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(host: &str, port: u16) -> ServerConfig {
        ServerConfig {
            host: host.to_string(),
            port,
            ..Default::default()
        }
    }

    #[test]
    fn default_listener_is_valid() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ipv6_host_is_accepted() {
        assert_eq!(on("::1", 8080).socket_addr().unwrap().to_string(), "[::1]:8080");
    }

    #[test]
    fn hostname_is_rejected() {
        assert_eq!(
            on("localhost", 8080).validate(),
            Err(ValidationError::InvalidBindAddress("localhost".to_string()))
        );
    }

    #[test]
    fn port_zero_is_rejected() {
        assert_eq!(on("127.0.0.1", 0).validate(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn cors_list_skips_blanks() {
        let config = ServerConfig {
            cors_origins: Some(" https://shop.example , ,http://localhost:5173,".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.cors_origins_list(),
            vec!["https://shop.example", "http://localhost:5173"]
        );
        assert!(ServerConfig::default().cors_origins_list().is_empty());
    }
}

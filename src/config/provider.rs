//! Payment provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Payment provider configuration (Mercado Pago)
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Private access token used for payment lookups
    pub access_token: Option<SecretString>,

    /// Shared secret expected on inbound notifications; the gate is open
    /// when unset or empty
    pub webhook_secret: Option<SecretString>,

    /// Payments API host
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl ProviderConfig {
    /// Access token, treating an empty value as absent
    pub fn access_token(&self) -> Option<SecretString> {
        non_empty(&self.access_token)
    }

    /// Webhook secret, treating an empty value as absent
    pub fn webhook_secret(&self) -> Option<SecretString> {
        non_empty(&self.webhook_secret)
    }

    /// Check if using a sandbox credential
    pub fn is_test_mode(&self) -> bool {
        self.access_token()
            .map(|t| t.expose_secret().starts_with("TEST-"))
            .unwrap_or(false)
    }

    /// Validate provider configuration
    ///
    /// A missing token or secret is not an error: the relay starts and
    /// reports the gap per request. A secret made only of whitespace is,
    /// since it would silently leave the gate open.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if let Some(secret) = &self.webhook_secret {
            let secret = secret.expose_secret();
            if !secret.is_empty() && secret.trim().is_empty() {
                return Err(ValidationError::BlankWebhookSecret);
            }
        }

        let url = self.api_base_url.as_str();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidProviderUrl);
        }
        if *environment == Environment::Production && !url.starts_with("https://") {
            return Err(ValidationError::ProviderUrlMustBeHttps);
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            webhook_secret: None,
            api_base_url: default_api_base_url(),
        }
    }
}

fn non_empty(secret: &Option<SecretString>) -> Option<SecretString> {
    secret
        .as_ref()
        .filter(|s| !s.expose_secret().trim().is_empty())
        .cloned()
}

fn default_api_base_url() -> String {
    "https://api.mercadopago.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> Option<SecretString> {
        Some(SecretString::new(s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::default();
        assert!(config.access_token().is_none());
        assert!(config.webhook_secret().is_none());
        assert_eq!(config.api_base_url, "https://api.mercadopago.com");
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_empty_secrets_are_absent() {
        let config = ProviderConfig {
            access_token: secret(""),
            webhook_secret: secret("  "),
            ..Default::default()
        };
        assert!(config.access_token().is_none());
        assert!(config.webhook_secret().is_none());
    }

    #[test]
    fn test_whitespace_secret_fails_validation() {
        let config = ProviderConfig {
            webhook_secret: secret("   "),
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::BlankWebhookSecret)
        );

        let config = ProviderConfig {
            webhook_secret: secret(""),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_is_test_mode() {
        let config = ProviderConfig {
            access_token: secret("TEST-123"),
            ..Default::default()
        };
        assert!(config.is_test_mode());

        let config = ProviderConfig {
            access_token: secret("APP_USR-123"),
            ..Default::default()
        };
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_validation_rejects_non_http_url() {
        let config = ProviderConfig {
            api_base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidProviderUrl)
        );
    }

    #[test]
    fn test_plain_http_only_outside_production() {
        let config = ProviderConfig {
            api_base_url: "http://localhost:9090".to_string(),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::ProviderUrlMustBeHttps)
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = ProviderConfig {
            access_token: secret("APP_USR-very-secret"),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("very-secret"));
    }
}

//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool size must be between 1 and 100")]
    InvalidPoolSize,

    #[error("Invalid provider API base URL")]
    InvalidProviderUrl,

    #[error("Provider API base URL must use HTTPS in production")]
    ProviderUrlMustBeHttps,

    #[error("Webhook shared secret is set but blank")]
    BlankWebhookSecret,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_wraps_the_reason() {
        let err = ConfigError::from(ValidationError::BlankWebhookSecret);
        assert!(matches!(
            err,
            ConfigError::ValidationFailed(ValidationError::BlankWebhookSecret)
        ));
        assert_eq!(
            err.to_string(),
            "Validation failed: Webhook shared secret is set but blank"
        );
    }
}

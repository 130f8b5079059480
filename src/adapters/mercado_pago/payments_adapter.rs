//! Mercado Pago payments adapter.
//!
//! Implements `TransactionLookup` against the Mercado Pago REST API.
//!
//! # Security
//!
//! - Access token held in `secrecy::SecretString`, exposed only for the
//!   `Authorization` header
//! - Response bodies of failed lookups are logged, never the token
//!
//! # Configuration
//!
//! ```ignore
//! let config = MercadoPagoConfig::new(Some(access_token));
//! let adapter = MercadoPagoAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::entitlement::TransactionRecord;
use crate::ports::{PaymentError, PaymentErrorCode, TransactionLookup};

use super::api_types::MpPayment;

/// Default API host.
pub const DEFAULT_API_BASE_URL: &str = "https://api.mercadopago.com";

/// Mercado Pago API configuration.
#[derive(Clone)]
pub struct MercadoPagoConfig {
    /// Private access token (`APP_USR-...` or `TEST-...`).
    access_token: Option<SecretString>,

    /// Base URL for the API (default: https://api.mercadopago.com).
    api_base_url: String,
}

impl MercadoPagoConfig {
    /// Create a new configuration. A `None` or empty token leaves the
    /// adapter unable to verify anything.
    pub fn new(access_token: Option<SecretString>) -> Self {
        Self {
            access_token: access_token.filter(|t| !t.expose_secret().is_empty()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether this is a sandbox credential.
    pub fn is_test_mode(&self) -> bool {
        self.access_token
            .as_ref()
            .map(|t| t.expose_secret().starts_with("TEST-"))
            .unwrap_or(false)
    }
}

/// Mercado Pago payments adapter.
pub struct MercadoPagoAdapter {
    config: MercadoPagoConfig,
    http_client: reqwest::Client,
}

impl MercadoPagoAdapter {
    /// Create a new adapter with the given configuration.
    pub fn new(config: MercadoPagoConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// `{api_base_url}/v1/payments/{id}` with the id as one percent-encoded
    /// path segment, so `/`, `?` and `#` in an untrusted id stay inside it.
    fn payment_url(&self, transaction_id: &str) -> Result<reqwest::Url, PaymentError> {
        // Dot segments would be dropped and resolve to another endpoint.
        if matches!(transaction_id, "." | "..") {
            return Err(PaymentError::not_found(transaction_id));
        }

        let invalid_base =
            |reason: String| PaymentError::new(PaymentErrorCode::ProviderError, reason);

        let mut url = reqwest::Url::parse(&self.config.api_base_url)
            .map_err(|e| invalid_base(format!("Invalid Mercado Pago API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid_base("Mercado Pago API base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(["v1", "payments", transaction_id]);
        Ok(url)
    }
}

#[async_trait]
impl TransactionLookup for MercadoPagoAdapter {
    fn has_credentials(&self) -> bool {
        self.config.access_token.is_some()
    }

    async fn fetch_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionRecord, PaymentError> {
        let token = self
            .config
            .access_token
            .as_ref()
            .ok_or_else(PaymentError::missing_credential)?;

        let response = self
            .http_client
            .get(self.payment_url(transaction_id)?)
            .bearer_auth(token.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                transaction_id = %transaction_id,
                status = status.as_u16(),
                body = %error_text,
                "Mercado Pago payment lookup returned an error"
            );
            let err = if status == reqwest::StatusCode::NOT_FOUND {
                PaymentError::not_found(transaction_id)
            } else {
                PaymentError::new(
                    PaymentErrorCode::ProviderError,
                    format!("Mercado Pago API error: {}", error_text),
                )
            };
            return Err(err.with_provider_status(status.as_u16()));
        }

        let payment: MpPayment = response.json().await.map_err(|e| {
            PaymentError::invalid_response(format!("Failed to parse Mercado Pago response: {}", e))
        })?;

        tracing::debug!(
            transaction_id = %transaction_id,
            status = ?payment.status,
            status_detail = ?payment.status_detail,
            test_mode = self.config.is_test_mode(),
            "Mercado Pago payment fetched"
        );

        Ok(payment.into_record(transaction_id))
    }
}

//! Payment provider port for transaction confirmation.
//!
//! Notifications are never trusted on their own: the only source of truth
//! for a transaction's status and payer is the provider's lookup API.
//!
//! # Design
//!
//! - **Read-only**: a single stateless lookup per notification
//! - **Gateway agnostic**: the record shape is the relay's, not the provider's
//! - **Retry-aware**: errors say whether redelivery may succeed

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entitlement::TransactionRecord;
use crate::domain::notification::NotificationError;

/// Port for looking up authoritative transaction state.
#[async_trait]
pub trait TransactionLookup: Send + Sync {
    /// Whether an access credential is available.
    ///
    /// Checked before any lookup so a misconfiguration is reported without
    /// a network round-trip.
    fn has_credentials(&self) -> bool;

    /// Fetch the transaction by provider id.
    async fn fetch_transaction(&self, transaction_id: &str)
        -> Result<TransactionRecord, PaymentError>;
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// HTTP status returned by the provider (if any).
    pub provider_status: Option<u16>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_status: None,
            retryable: code.is_retryable(),
        }
    }

    /// Attach the provider's HTTP status.
    pub fn with_provider_status(mut self, status: u16) -> Self {
        self.provider_status = Some(status);
        self
    }

    /// No access credential configured.
    pub fn missing_credential() -> Self {
        Self::new(
            PaymentErrorCode::MissingCredential,
            "provider access token not configured",
        )
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a not found error.
    pub fn not_found(transaction_id: &str) -> Self {
        Self::new(
            PaymentErrorCode::NotFound,
            format!("transaction {} not found", transaction_id),
        )
    }

    /// Provider responded but the body was unusable.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidResponse, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for NotificationError {
    fn from(err: PaymentError) -> Self {
        match err.code {
            PaymentErrorCode::MissingCredential => NotificationError::MissingAccessToken,
            _ => NotificationError::ProviderFetch(err.to_string()),
        }
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// No access token configured.
    MissingCredential,

    /// Network/connection error.
    NetworkError,

    /// Provider returned a non-success status.
    ProviderError,

    /// Transaction does not exist (common with simulator traffic).
    NotFound,

    /// Provider body could not be parsed.
    InvalidResponse,
}

impl PaymentErrorCode {
    /// Check if this error type is retryable.
    ///
    /// Not-found is retryable: the provider's simulator references ids that
    /// may never exist, but real notifications can race the lookup index.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, PaymentErrorCode::MissingCredential)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::MissingCredential => "missing_credential",
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::InvalidResponse => "invalid_response",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_error_displays_code_and_message() {
        let err = PaymentError::network("connection reset");
        assert_eq!(err.to_string(), "network_error: connection reset");
    }

    #[test]
    fn not_found_names_transaction() {
        let err = PaymentError::not_found("123456").with_provider_status(404);
        assert_eq!(err.message, "transaction 123456 not found");
        assert_eq!(err.provider_status, Some(404));
        assert!(err.retryable);
    }

    #[test]
    fn missing_credential_is_not_retryable() {
        assert!(!PaymentError::missing_credential().retryable);
    }

    #[test]
    fn missing_credential_maps_to_configuration_failure() {
        let err: NotificationError = PaymentError::missing_credential().into();
        assert!(matches!(err, NotificationError::MissingAccessToken));
    }

    #[test]
    fn other_codes_map_to_transient_fetch_failure() {
        for err in [
            PaymentError::network("x"),
            PaymentError::not_found("1"),
            PaymentError::new(PaymentErrorCode::ProviderError, "500"),
            PaymentError::invalid_response("bad json"),
        ] {
            let mapped: NotificationError = err.into();
            assert!(matches!(mapped, NotificationError::ProviderFetch(_)));
        }
    }
}

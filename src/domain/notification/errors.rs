//! Notification outcomes and error taxonomy.
//!
//! Every path through the pipeline ends in exactly one of these, and each
//! maps to a fixed status code and short plain-text body. The status code is
//! what controls provider redelivery:
//!
//! - 2xx: acknowledged, the provider stops redelivering
//! - 401: rejected, redelivery would not help
//! - 5xx: the provider redelivers later
//!
//! 200 is returned only when the notification reached an intended terminal
//! outcome. Anything that should have happened but could not complete
//! returns 500 so the next redelivery can finish it.

use http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::UserId;

/// Successful terminal outcomes of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Wrong event type or no transaction id.
    Ignored,
    /// The transaction exists but has not been approved.
    Pending { status: String },
    /// Entitlement written for the derived user key.
    Granted {
        user_id: UserId,
        transaction_id: String,
    },
}

impl NotificationOutcome {
    /// Plain-text response body.
    pub fn response_body(&self) -> &'static str {
        match self {
            NotificationOutcome::Ignored => "ignored",
            NotificationOutcome::Pending { .. } => "pending/not-approved",
            NotificationOutcome::Granted { .. } => "ok",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }
}

/// Failures during notification handling.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Shared secret configured but not presented, or presented wrong.
    #[error("Unauthorized notification")]
    Unauthorized,

    /// No provider access token is configured.
    #[error("Missing provider access token")]
    MissingAccessToken,

    /// The provider lookup did not succeed.
    #[error("Provider lookup failed: {0}")]
    ProviderFetch(String),

    /// Approved transaction with no email to attribute it to.
    #[error("Approved transaction {transaction_id} has no payer email")]
    MissingEmail { transaction_id: String },

    /// Anything else, including store failures.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NotificationError {
    /// Returns true if provider redelivery may resolve this error.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, NotificationError::Unauthorized)
    }

    /// Maps the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            NotificationError::Unauthorized => StatusCode::UNAUTHORIZED,

            NotificationError::MissingAccessToken
            | NotificationError::ProviderFetch(_)
            | NotificationError::MissingEmail { .. }
            | NotificationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text response body. Never carries internal detail.
    pub fn response_body(&self) -> &'static str {
        match self {
            NotificationError::Unauthorized => "unauthorized",
            NotificationError::MissingAccessToken => "missing access token",
            NotificationError::ProviderFetch(_) => "provider fetch fail",
            NotificationError::MissingEmail { .. } => "no payer email",
            NotificationError::Internal(_) => "error",
        }
    }
}

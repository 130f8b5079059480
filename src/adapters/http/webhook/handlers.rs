//! HTTP handlers for provider notifications.
//!
//! These handlers connect Axum routes to the notification command handler.
//! Every request ends in a plain-text body and a status code the provider
//! reads as "stop" (2xx/401) or "redeliver" (5xx).

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde_json::Value;

use crate::application::handlers::notification::{
    HandlePaymentNotificationCommand, HandlePaymentNotificationHandler,
};
use crate::domain::notification::{AuthenticityGate, NotificationError, NotificationOutcome};
use crate::ports::{TransactionLookup, UserStore};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct WebhookAppState {
    pub gate: AuthenticityGate,
    pub transaction_lookup: Arc<dyn TransactionLookup>,
    pub user_store: Arc<dyn UserStore>,
}

impl WebhookAppState {
    /// Create the notification handler from the shared state.
    pub fn notification_handler(&self) -> HandlePaymentNotificationHandler {
        HandlePaymentNotificationHandler::new(
            self.gate.clone(),
            self.transaction_lookup.clone(),
            self.user_store.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/mp-webhook - Handle a Mercado Pago notification
///
/// Accepts both the JSON webhook format and the legacy query-string IPN
/// format. An absent or unparseable body is treated as empty.
pub async fn handle_mp_notification(
    State(state): State<WebhookAppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<NotificationResponse, NotificationApiError> {
    let cmd = HandlePaymentNotificationCommand {
        body: parse_body(&body),
        query,
        headers,
    };

    let outcome = state.notification_handler().handle(cmd).await?;
    Ok(NotificationResponse(outcome))
}

fn parse_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Notification body is not JSON, treating as empty");
        Value::Null
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// Successful notification outcome as an HTTP response.
pub struct NotificationResponse(pub NotificationOutcome);

impl IntoResponse for NotificationResponse {
    fn into_response(self) -> axum::response::Response {
        (self.0.status_code(), self.0.response_body()).into_response()
    }
}

/// API error type that converts notification errors to HTTP responses.
pub struct NotificationApiError(NotificationError);

impl From<NotificationError> for NotificationApiError {
    fn from(err: NotificationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for NotificationApiError {
    fn into_response(self) -> axum::response::Response {
        let status: StatusCode = self.0.status_code();
        if status.is_server_error() {
            tracing::warn!(
                error = %self.0,
                retryable = self.0.is_retryable(),
                "Notification not completed, provider will redeliver"
            );
        }
        (status, self.0.response_body()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_body_is_null() {
        assert_eq!(parse_body(b""), Value::Null);
    }

    #[test]
    fn malformed_body_is_null() {
        assert_eq!(parse_body(b"{not json"), Value::Null);
        assert_eq!(parse_body(b"topic=payment&id=1"), Value::Null);
    }

    #[test]
    fn json_body_is_parsed() {
        assert_eq!(
            parse_body(br#"{"type":"payment","data":{"id":"1"}}"#),
            json!({"type": "payment", "data": {"id": "1"}})
        );
    }

    #[test]
    fn errors_map_to_plain_text_status() {
        let response = NotificationApiError(NotificationError::Unauthorized).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response =
            NotificationApiError(NotificationError::ProviderFetch("timeout".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

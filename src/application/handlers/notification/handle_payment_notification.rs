//! HandlePaymentNotificationHandler - Command handler for provider payment
//! notifications.
//!
//! The pipeline is strictly linear:
//!
//! 1. Normalize body + query into `(event_type, transaction_id)`
//! 2. Short-circuit ignorable notifications (no gate, no lookup)
//! 3. Check the shared-secret gate
//! 4. Look up the authoritative transaction
//! 5. Stop on anything but `approved`
//! 6. Merge the entitlement into the user document
//!
//! Each step is idempotent, so provider redelivery of any notification,
//! including ones already answered, is harmless.

use std::collections::HashMap;
use std::sync::Arc;

use http::HeaderMap;
use serde_json::Value;

use crate::domain::notification::{
    AuthenticityGate, Notification, NotificationError, NotificationOutcome,
};
use crate::ports::{TransactionLookup, UserStore};

use super::grant_entitlement::GrantEntitlementHandler;
use super::verify_transaction::verify_transaction;

/// Command to handle a provider notification.
#[derive(Debug, Clone)]
pub struct HandlePaymentNotificationCommand {
    /// Parsed JSON body, `Value::Null` when absent or unparseable.
    pub body: Value,
    /// Query-string parameters.
    pub query: HashMap<String, String>,
    /// Request headers, consulted only by the authenticity gate.
    pub headers: HeaderMap,
}

/// Handler for processing provider payment notifications.
pub struct HandlePaymentNotificationHandler {
    gate: AuthenticityGate,
    lookup: Arc<dyn TransactionLookup>,
    grants: GrantEntitlementHandler,
}

impl HandlePaymentNotificationHandler {
    pub fn new(
        gate: AuthenticityGate,
        lookup: Arc<dyn TransactionLookup>,
        store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            gate,
            lookup,
            grants: GrantEntitlementHandler::new(store),
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentNotificationCommand,
    ) -> Result<NotificationOutcome, NotificationError> {
        // 1. Normalize
        let notification = Notification::normalize(&cmd.body, &cmd.query);

        // 2. Classify
        let payment = match notification.classify() {
            Ok(payment) => payment,
            Err(reason) => {
                tracing::info!(
                    reason = %reason,
                    body = %notification.raw_body,
                    query = ?notification.raw_query,
                    "Notification ignored"
                );
                return Ok(NotificationOutcome::Ignored);
            }
        };

        tracing::info!(
            event_type = ?notification.event_type,
            transaction_id = %payment.transaction_id,
            "Payment notification received"
        );

        // 3. Authenticate
        if let Err(e) = self.gate.check(&cmd.headers) {
            tracing::warn!(
                transaction_id = %payment.transaction_id,
                body = %notification.raw_body,
                query = ?notification.raw_query,
                "Notification rejected: shared secret missing or invalid"
            );
            return Err(e);
        }

        // 4. Verify
        let record = verify_transaction(self.lookup.as_ref(), &payment.transaction_id)
            .await
            .map_err(|e| log_raw(&notification, e))?;

        // 5. Only approved transactions grant anything
        if !record.is_approved() {
            tracing::info!(
                transaction_id = %payment.transaction_id,
                status = %record.status,
                "Transaction not approved yet"
            );
            return Ok(NotificationOutcome::Pending {
                status: record.status.to_string(),
            });
        }

        // 6. Grant
        self.grants
            .handle(&record)
            .await
            .map_err(|e| log_raw(&notification, e))
    }
}

/// Dumps the notification as received so a failed request can be replayed.
fn log_raw(notification: &Notification, error: NotificationError) -> NotificationError {
    tracing::info!(
        error = %error,
        body = %notification.raw_body,
        query = ?notification.raw_query,
        "Raw notification for failed request"
    );
    error
}

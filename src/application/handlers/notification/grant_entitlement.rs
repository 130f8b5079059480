//! GrantEntitlementHandler - writes the premium entitlement for an approved
//! transaction.

use std::sync::Arc;

use crate::domain::entitlement::{EntitlementGrant, TransactionRecord};
use crate::domain::foundation::UserId;
use crate::domain::notification::{NotificationError, NotificationOutcome};
use crate::ports::UserStore;

/// Handler for the entitlement update.
///
/// Replaying the same approved transaction writes the same fields to the
/// same key, so at-least-once delivery is safe.
pub struct GrantEntitlementHandler {
    store: Arc<dyn UserStore>,
}

impl GrantEntitlementHandler {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        record: &TransactionRecord,
    ) -> Result<NotificationOutcome, NotificationError> {
        let email = record.attributable_email().ok_or_else(|| {
            tracing::error!(
                transaction_id = %record.id,
                "Approved transaction has no payer email, cannot attribute entitlement"
            );
            NotificationError::MissingEmail {
                transaction_id: record.id.clone(),
            }
        })?;

        let user_id = UserId::from_email(email).map_err(|_| NotificationError::MissingEmail {
            transaction_id: record.id.clone(),
        })?;

        let patch = EntitlementGrant::premium(record.id.clone()).to_patch();
        self.store.upsert_merge(&user_id, patch).await.map_err(|e| {
            tracing::error!(
                transaction_id = %record.id,
                user_id = %user_id,
                error = %e,
                "Failed to write entitlement"
            );
            NotificationError::from(e)
        })?;

        tracing::info!(
            transaction_id = %record.id,
            user_id = %user_id,
            "User granted premium"
        );

        Ok(NotificationOutcome::Granted {
            user_id,
            transaction_id: record.id.clone(),
        })
    }
}

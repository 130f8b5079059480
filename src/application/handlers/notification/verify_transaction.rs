//! Transaction verification step.

use crate::domain::entitlement::TransactionRecord;
use crate::domain::notification::NotificationError;
use crate::ports::TransactionLookup;

/// Looks up the authoritative transaction for a notification.
///
/// A missing credential is reported before any call is attempted. Any
/// provider failure is transient from the caller's point of view: the
/// provider is told to redeliver.
pub async fn verify_transaction(
    lookup: &dyn TransactionLookup,
    transaction_id: &str,
) -> Result<TransactionRecord, NotificationError> {
    if !lookup.has_credentials() {
        tracing::error!(
            transaction_id = %transaction_id,
            "Provider access token not configured, cannot verify transaction"
        );
        return Err(NotificationError::MissingAccessToken);
    }

    let record = lookup.fetch_transaction(transaction_id).await.map_err(|e| {
        tracing::error!(
            transaction_id = %transaction_id,
            error = %e,
            provider_status = ?e.provider_status,
            "Transaction lookup failed"
        );
        NotificationError::from(e)
    })?;

    tracing::debug!(
        transaction_id = %record.id,
        status = %record.status,
        "Transaction fetched"
    );

    Ok(record)
}

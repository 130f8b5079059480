//! Mock transaction lookup for testing.
//!
//! Provides a configurable implementation of `TransactionLookup` for unit
//! and integration tests. Supports:
//! - Pre-configured transactions
//! - Error injection
//! - Lookup tracking

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entitlement::{TransactionRecord, TransactionStatus};
use crate::ports::{PaymentError, TransactionLookup};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.add_transaction(MockPaymentProvider::record("555", "approved", Some("a@b.com")));
///
/// let record = mock.fetch_transaction("555").await?;
/// assert_eq!(mock.lookup_count(), 1);
/// ```
#[derive(Clone)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
    has_credentials: bool,
}

#[derive(Default)]
struct MockState {
    /// Known transactions by id.
    transactions: HashMap<String, TransactionRecord>,

    /// Error to return on the next lookup.
    next_error: Option<PaymentError>,

    /// Ids looked up, in call order.
    lookups: Vec<String>,
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentProvider {
    /// Create a mock with a credential configured.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState::default())),
            has_credentials: true,
        }
    }

    /// Create a mock that behaves like a deployment without an access token.
    pub fn without_credentials() -> Self {
        Self {
            has_credentials: false,
            ..Self::new()
        }
    }

    /// Build a transaction record with no metadata.
    pub fn record(id: &str, status: &str, payer_email: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            id: id.to_string(),
            status: TransactionStatus::from(status.to_string()),
            payer_email: payer_email.map(str::to_string),
            metadata: BTreeMap::new(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a transaction to the "provider".
    pub fn add_transaction(&self, record: TransactionRecord) {
        let id = record.id.clone();
        self.inner.lock().unwrap().transactions.insert(id, record);
    }

    /// Set an error to return on the next lookup.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Number of lookups that reached the provider.
    pub fn lookup_count(&self) -> usize {
        self.inner.lock().unwrap().lookups.len()
    }

    /// Ids looked up, in call order.
    pub fn lookups(&self) -> Vec<String> {
        self.inner.lock().unwrap().lookups.clone()
    }
}

#[async_trait]
impl TransactionLookup for MockPaymentProvider {
    fn has_credentials(&self) -> bool {
        self.has_credentials
    }

    async fn fetch_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionRecord, PaymentError> {
        if !self.has_credentials {
            return Err(PaymentError::missing_credential());
        }

        let mut state = self.inner.lock().unwrap();
        state.lookups.push(transaction_id.to_string());

        if let Some(err) = state.next_error.take() {
            return Err(err);
        }

        state
            .transactions
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found(transaction_id).with_provider_status(404))
    }
}

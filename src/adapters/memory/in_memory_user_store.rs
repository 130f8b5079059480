//! In-memory user store.
//!
//! Backs local development when no database is configured, and serves as
//! the store double in tests.
//!
//! # Panics
//!
//! The test helpers (`document`, `seed`, `len`, ...) use `.expect()` on lock
//! operations and panic if a lock is poisoned. The `UserStore` methods never
//! panic; a poisoned lock surfaces as `StoreError::Unavailable`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::entitlement::MergePatch;
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{StoreError, UserStore};

/// In-memory user document store.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(InMemoryUserStore::new());
/// store.upsert_merge(&user_id, patch).await?;
///
/// assert_eq!(store.write_count(), 1);
/// assert_eq!(store.document(&user_id).unwrap()["premium"], json!(true));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    documents: RwLock<HashMap<UserId, Map<String, Value>>>,
    writes: RwLock<usize>,
    write_failure: RwLock<Option<String>>,
}

impl InMemoryUserStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Returns a copy of the document stored under `user_id`.
    pub fn document(&self, user_id: &UserId) -> Option<Map<String, Value>> {
        self.documents
            .read()
            .expect("InMemoryUserStore: documents lock poisoned")
            .get(user_id)
            .cloned()
    }

    /// Stores `document` as-is, as another producer would have.
    ///
    /// Non-object values are ignored.
    pub fn seed(&self, user_id: &UserId, document: Value) {
        if let Value::Object(map) = document {
            self.documents
                .write()
                .expect("InMemoryUserStore: documents lock poisoned")
                .insert(user_id.clone(), map);
        }
    }

    /// Number of successful merges since creation.
    pub fn write_count(&self) -> usize {
        *self
            .writes
            .read()
            .expect("InMemoryUserStore: writes lock poisoned")
    }

    /// Makes every subsequent write fail with `message`.
    pub fn fail_writes(&self, message: &str) {
        *self
            .write_failure
            .write()
            .expect("InMemoryUserStore: failure lock poisoned") = Some(message.to_string());
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents
            .read()
            .expect("InMemoryUserStore: documents lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn upsert_merge(&self, user_id: &UserId, patch: MergePatch) -> Result<(), StoreError> {
        if let Some(message) = self.write_failure.read().map_err(poisoned)?.clone() {
            return Err(StoreError::Unavailable(message));
        }

        let (literals, stamped) = patch.partition();
        let now = Value::String(Timestamp::now().to_rfc3339());

        let mut documents = self.documents.write().map_err(poisoned)?;
        let document = documents.entry(user_id.clone()).or_default();
        for (name, value) in literals {
            document.insert(name, value);
        }
        for name in stamped {
            document.insert(name, now.clone());
        }
        drop(documents);

        *self.writes.write().map_err(poisoned)? += 1;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.documents.read().map_err(poisoned).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::{EntitlementGrant, FieldValue};
    use serde_json::json;

    fn user() -> UserId {
        UserId::new("a_b.com").unwrap()
    }

    #[tokio::test]
    async fn creates_document_when_absent() {
        let store = InMemoryUserStore::new();
        store
            .upsert_merge(&user(), EntitlementGrant::premium("555").to_patch())
            .await
            .unwrap();

        let doc = store.document(&user()).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc["premium"], json!(true));
        assert!(doc["premiumLastUpdate"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn merge_preserves_unnamed_fields() {
        let store = InMemoryUserStore::new();
        store.seed(&user(), json!({"displayName": "Ana", "lastTransactionId": "1"}));

        let patch = MergePatch::new().set("lastTransactionId", FieldValue::Text("2".to_string()));
        store.upsert_merge(&user(), patch).await.unwrap();

        let doc = store.document(&user()).unwrap();
        assert_eq!(doc["displayName"], json!("Ana"));
        assert_eq!(doc["lastTransactionId"], json!("2"));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn injected_failure_writes_nothing() {
        let store = InMemoryUserStore::new();
        store.fail_writes("disk full");

        let err = store
            .upsert_merge(&user(), EntitlementGrant::premium("1").to_patch())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("disk full"));
        assert!(store.is_empty());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn ping_succeeds() {
        assert!(InMemoryUserStore::new().ping().await.is_ok());
    }
}

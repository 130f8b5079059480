//! User store port (write side).
//!
//! The store owns user documents in the `users` collection; this relay only
//! ever merges a few fields into them.
//!
//! # Design
//!
//! - **Upsert-merge**: create if absent, otherwise touch only named fields
//! - **Atomic per key**: concurrent merges on one key must not lose fields
//! - **Server time**: `FieldValue::ServerTimestamp` is resolved by the store

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entitlement::MergePatch;
use crate::domain::foundation::UserId;
use crate::domain::notification::NotificationError;

/// Port for user document persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Merge `patch` into the document keyed by `user_id`, creating it if
    /// absent. Fields not named in the patch survive unchanged.
    ///
    /// # Errors
    ///
    /// - `StoreError::Database` on persistence failure
    async fn upsert_merge(&self, user_id: &UserId, patch: MergePatch) -> Result<(), StoreError>;

    /// Cheap connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Errors from the user store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Store already initialized")]
    AlreadyInitialized,

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl From<StoreError> for NotificationError {
    fn from(err: StoreError) -> Self {
        NotificationError::Internal(err.to_string())
    }
}

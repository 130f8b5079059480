//! Entitlement domain module.
//!
//! Decides whether a confirmed transaction grants premium access, to whom,
//! and what the resulting user-document patch looks like.
//!
//! # Module Structure
//!
//! - `transaction` - provider transaction record, status, email selection
//! - `grant` - merge patches and the premium grant

mod grant;
mod transaction;

pub use grant::{
    EntitlementGrant, FieldValue, MergePatch, FIELD_LAST_TRANSACTION_ID, FIELD_PREMIUM,
    FIELD_PREMIUM_LAST_UPDATE,
};
pub use transaction::{TransactionRecord, TransactionStatus, METADATA_EMAIL_KEYS};

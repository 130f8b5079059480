//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TransactionLookup` - authoritative transaction state from the provider
//! - `UserStore` - upsert-merge of user documents

mod payment_provider;
mod user_store;

pub use payment_provider::{PaymentError, PaymentErrorCode, TransactionLookup};
pub use user_store::{StoreError, UserStore};

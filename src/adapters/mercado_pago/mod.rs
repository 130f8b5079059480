//! Mercado Pago payment provider adapter.
//!
//! Implements the `TransactionLookup` port against the payments API:
//! - Authoritative payment lookup by id
//! - Mapping of the payment object onto `TransactionRecord`
//!
//! # Configuration
//!
//! Required environment variables:
//! - `PROVIDER_ACCESS_TOKEN`: private access token (APP_USR-... or TEST-...)

mod api_types;
mod mock_payment_provider;
mod payments_adapter;

pub use api_types::{MpPayer, MpPayment};
pub use mock_payment_provider::MockPaymentProvider;
pub use payments_adapter::{MercadoPagoAdapter, MercadoPagoConfig, DEFAULT_API_BASE_URL};

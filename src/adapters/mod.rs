//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routes for notifications and health checks
//! - `mercado_pago` - Payments API lookup (and a mock for tests)
//! - `postgres` - User document store
//! - `memory` - In-memory user store for development and tests

pub mod http;
pub mod memory;
pub mod mercado_pago;
pub mod postgres;

pub use memory::InMemoryUserStore;
pub use mercado_pago::{MercadoPagoAdapter, MercadoPagoConfig, MockPaymentProvider};
pub use postgres::PostgresUserStore;

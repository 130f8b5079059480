//! PostgreSQL adapters - Database implementations for store ports.
//!
//! This module provides:
//! - `init_pool` - Process-wide pool, created once, migrations applied
//! - `PostgresUserStore` - Upsert-merge of user documents in `users`

mod pool;
mod user_store;

pub use pool::init_pool;
pub use user_store::PostgresUserStore;

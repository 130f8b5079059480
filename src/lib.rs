//! Mercado Pago entitlement relay
//!
//! Receives provider payment notifications, confirms the referenced
//! transaction against the provider's API, and grants the premium
//! entitlement on the paying user's document.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (user keys, timestamps, errors)
//! - `notification` - Normalization, classification and authenticity of provider calls
//! - `entitlement` - Transaction confirmation rules and entitlement grants

pub mod entitlement;
pub mod foundation;
pub mod notification;

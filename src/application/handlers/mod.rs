//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod notification;

pub use notification::{
    GrantEntitlementHandler, HandlePaymentNotificationCommand, HandlePaymentNotificationHandler,
};

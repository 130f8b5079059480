//! Payment notification handlers.

mod grant_entitlement;
mod handle_payment_notification;
mod verify_transaction;

pub use grant_entitlement::GrantEntitlementHandler;
pub use handle_payment_notification::{
    HandlePaymentNotificationCommand, HandlePaymentNotificationHandler,
};
pub use verify_transaction::verify_transaction;

//! Notification domain module.
//!
//! Turns heterogeneous provider calls into one classified event and decides
//! whether the caller is allowed to trigger further work.
//!
//! # Module Structure
//!
//! - `normalizer` - ordered-fallback extraction of event type and id
//! - `authenticity` - shared-secret header gate
//! - `errors` - outcome and error taxonomy with HTTP mapping

mod authenticity;
mod errors;
mod normalizer;

pub use authenticity::{AuthenticityGate, SECRET_HEADERS};
pub use errors::{NotificationError, NotificationOutcome};
pub use normalizer::{IgnoreReason, Notification, PaymentNotification, PAYMENT_EVENT_TYPE};

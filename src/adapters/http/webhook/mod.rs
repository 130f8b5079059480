//! HTTP adapter for provider notifications.
//!
//! Exposes the notification pipeline via:
//! - `POST /api/mp-webhook` - Mercado Pago webhook and legacy IPN calls

mod handlers;
mod routes;

pub use handlers::{
    handle_mp_notification, NotificationApiError, NotificationResponse, WebhookAppState,
};
pub use routes::webhook_routes;

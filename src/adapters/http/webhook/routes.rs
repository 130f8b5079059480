//! Axum router configuration for notification endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_mp_notification, WebhookAppState};

/// Create the notification router.
///
/// # Routes
///
/// ## Webhook Endpoints (no auth, shared secret checked per notification)
/// - `POST /mp-webhook` - Handle Mercado Pago notifications
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api", webhook_routes())
///     .with_state(app_state);
/// ```
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new().route("/mp-webhook", post(handle_mp_notification))
}

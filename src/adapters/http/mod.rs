//! HTTP adapters - REST API implementations.
//!
//! The relay exposes one notification endpoint plus health checks. The full
//! application router wraps them in request tracing and CORS, and turns a
//! panic anywhere below it into a plain `500 error` response.

pub mod health;
pub mod webhook;

use std::any::Any as PanicPayload;

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// Re-export key types for convenience
pub use health::health_routes;
pub use webhook::{webhook_routes, WebhookAppState};

/// Build the complete application router.
///
/// # Routes
/// - `GET /` - Liveness
/// - `GET /health/ready` - Readiness
/// - `POST /api/mp-webhook` - Mercado Pago notifications
///
/// An empty `cors_origins` list allows any origin.
pub fn app_router(state: WebhookAppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(health_routes())
        .nest("/api", webhook_routes())
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

/// Same body as any other internal fault; the provider will redeliver.
fn panic_response(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    tracing::error!(panic = %detail, "Request handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, "error").into_response()
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::memory::InMemoryUserStore;
    use crate::adapters::mercado_pago::MockPaymentProvider;
    use crate::domain::notification::AuthenticityGate;

    fn state() -> WebhookAppState {
        WebhookAppState {
            gate: AuthenticityGate::open(),
            transaction_lookup: Arc::new(MockPaymentProvider::new()),
            user_store: Arc::new(InMemoryUserStore::new()),
        }
    }

    #[tokio::test]
    async fn app_router_serves_all_routes() {
        let app = app_router(state(), &[]);

        let live = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(live.status(), StatusCode::OK);

        let webhook = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/mp-webhook")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(webhook.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cors_echoes_configured_origin() {
        let app = app_router(state(), &["https://app.example.com".to_string()]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "https://app.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://app.example.com"
        );
    }
}

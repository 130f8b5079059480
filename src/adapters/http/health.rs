//! Liveness and readiness endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Router};

use super::webhook::WebhookAppState;

/// Body of the liveness response.
pub const LIVENESS_BODY: &str = "Webhook backend online";

/// Create the health router.
///
/// # Routes
/// - `GET /` - Liveness, does not check dependencies
/// - `GET /health/ready` - Readiness, 503 when the user store is unreachable
pub fn health_routes() -> Router<WebhookAppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/health/ready", get(readiness))
}

async fn liveness() -> &'static str {
    LIVENESS_BODY
}

async fn readiness(State(state): State<WebhookAppState>) -> StatusCode {
    match state.user_store.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::adapters::memory::InMemoryUserStore;
    use crate::adapters::mercado_pago::MockPaymentProvider;
    use crate::domain::entitlement::MergePatch;
    use crate::domain::foundation::UserId;
    use crate::domain::notification::AuthenticityGate;
    use crate::ports::{StoreError, UserStore};

    struct DownStore;

    #[async_trait]
    impl UserStore for DownStore {
        async fn upsert_merge(&self, _: &UserId, _: MergePatch) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    fn router(store: Arc<dyn UserStore>) -> Router {
        health_routes().with_state(WebhookAppState {
            gate: AuthenticityGate::open(),
            transaction_lookup: Arc::new(MockPaymentProvider::new()),
            user_store: store,
        })
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn liveness_reports_online() {
        let response = router(Arc::new(InMemoryUserStore::new()))
            .oneshot(get_request("/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], LIVENESS_BODY.as_bytes());
    }

    #[tokio::test]
    async fn readiness_ok_when_store_answers() {
        let response = router(Arc::new(InMemoryUserStore::new()))
            .oneshot(get_request("/health/ready"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_unavailable_when_store_down() {
        let response = router(Arc::new(DownStore))
            .oneshot(get_request("/health/ready"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

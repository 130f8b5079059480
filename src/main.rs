//! Mercado Pago entitlement relay.
//!
//! Receives payment notifications, confirms each one against the provider's
//! payments API, and marks the paying user's document as premium.
//!
//! # Routes
//!
//! - `GET /` - Liveness
//! - `GET /health/ready` - Readiness (user store reachable)
//! - `POST /api/mp-webhook` - Provider notifications
//!
//! # Configuration
//!
//! See [`mp_entitlement_relay::config`]. The conventional variables are
//! `PORT`, `PROVIDER_ACCESS_TOKEN`, `WEBHOOK_SHARED_SECRET` and
//! `DATABASE_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use mp_entitlement_relay::adapters::http::{app_router, WebhookAppState};
use mp_entitlement_relay::adapters::memory::InMemoryUserStore;
use mp_entitlement_relay::adapters::mercado_pago::{MercadoPagoAdapter, MercadoPagoConfig};
use mp_entitlement_relay::adapters::postgres::{init_pool, PostgresUserStore};
use mp_entitlement_relay::config::{AppConfig, ConfigError};
use mp_entitlement_relay::domain::notification::AuthenticityGate;
use mp_entitlement_relay::ports::UserStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;

    init_tracing(&config);

    config.validate().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        ConfigError::ValidationFailed(e)
    })?;

    announce_security_posture(&config);

    let user_store = init_user_store(&config).await?;

    let transaction_lookup = Arc::new(MercadoPagoAdapter::new(
        MercadoPagoConfig::new(config.provider.access_token())
            .with_base_url(config.provider.api_base_url.clone()),
    ));

    let state = WebhookAppState {
        gate: AuthenticityGate::new(config.provider.webhook_secret()),
        transaction_lookup,
        user_store,
    };
    let app = app_router(state, &config.server.cors_origins_list());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        "Webhook relay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Initialize tracing with EnvFilter.
///
/// `RUST_LOG` wins over `server.log_level`. Production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.log_level.clone().into());

    let json = config.is_production();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

fn announce_security_posture(config: &AppConfig) {
    if config.provider.access_token().is_none() {
        tracing::warn!(
            "PROVIDER_ACCESS_TOKEN not set: actionable notifications will fail until it is configured"
        );
    } else if config.provider.is_test_mode() {
        tracing::info!("Using sandbox provider credentials");
    }

    if config.provider.webhook_secret().is_none() {
        tracing::info!(
            "WEBHOOK_SHARED_SECRET not set: running in reduced-security mode, notifications are not authenticated"
        );
    }
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise the in-memory store.
///
/// Validation has already rejected a production config without a database.
async fn init_user_store(config: &AppConfig) -> Result<Arc<dyn UserStore>, BoxError> {
    if config.store.database_url().is_none() {
        tracing::warn!("DATABASE_URL not set: using in-memory user store, grants are not persisted");
        return Ok(Arc::new(InMemoryUserStore::new()));
    }

    let pool = init_pool(&config.store).await?;
    tracing::info!(
        max_connections = config.store.max_connections,
        "Database pool created, migrations applied"
    );
    Ok(Arc::new(PostgresUserStore::new(pool.clone())))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

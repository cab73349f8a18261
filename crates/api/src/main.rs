//! Section Factory API - storefront section marketplace backend.
//!
//! This binary serves the JSON API on port 5000 by default.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - `PostgreSQL` catalog via sqlx, or an in-memory store for local runs
//! - Sentry error tracking and `tracing` structured logs
//!
//! Migrations and seeding are not run here; use `sf-cli migrate` and
//! `sf-cli seed`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;
use std::sync::Arc;

use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use section_factory_api::config::{ApiConfig, LogFormat, StorageBackend};
use section_factory_api::db::{self, MemoryStore, PgStore, SectionStore};
use section_factory_api::seed;
use section_factory_api::state::AppState;

const DEFAULT_LOG_FILTER: &str = "section_factory_api=info,tower_http=debug";

/// Start the Sentry client when a DSN is configured.
///
/// The returned guard flushes pending events on drop, so it must live for
/// the whole process.
fn init_sentry(config: &ApiConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Cow::Owned),
        sample_rate: config.sentry_sample_rate,
        traces_sample_rate: config.sentry_traces_sample_rate,
        attach_stacktrace: true,
        ..Default::default()
    };

    Some(sentry::init((dsn, options)))
}

/// Warnings and errors become Sentry events; info and debug become
/// breadcrumbs on the next event.
fn sentry_level_filter(metadata: &tracing::Metadata<'_>) -> EventFilter {
    match *metadata.level() {
        Level::ERROR | Level::WARN => EventFilter::Event,
        Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    }
}

/// Install the global subscriber: `RUST_LOG` filter, one formatter chosen by
/// `LOG_FORMAT`, and the Sentry bridge.
fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (json, text) = match format {
        LogFormat::Json => (
            Some(tracing_subscriber::fmt::layer().json().flatten_event(true)),
            None,
        ),
        LogFormat::Text => (None, Some(tracing_subscriber::fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .with(sentry_tracing::layer().event_filter(sentry_level_filter))
        .init();
}

/// Connect the configured storage backend.
async fn build_store(config: &ApiConfig) -> Arc<dyn SectionStore> {
    match &config.storage {
        StorageBackend::Postgres { database_url } => {
            let pool = db::create_pool(database_url)
                .await
                .expect("Failed to connect to PostgreSQL");
            tracing::info!("Connected to PostgreSQL");
            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            let store = MemoryStore::new();
            let catalog = seed::bundled_catalog().expect("Bundled catalog is invalid");
            let count = seed::reseed(&store, catalog)
                .await
                .expect("Failed to seed in-memory store");
            tracing::warn!(sections = count, "Using in-memory storage; data is lost on shutdown");
            Arc::new(store)
        }
    }
}

#[tokio::main]
async fn main() {
    let config = ApiConfig::from_env().expect("Failed to load configuration");

    // Sentry before the subscriber so the tracing bridge has a client.
    let sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);
    if sentry_guard.is_some() {
        tracing::info!("Sentry error tracking enabled");
    }

    let state = AppState::new(build_store(&config).await);

    let app = section_factory_api::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Cannot listen on {addr}: {e}"));
    tracing::info!(%addr, "Section Factory API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

/// Resolve on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutting down, draining in-flight requests");
}

//! Castle Back binary entrypoint wiring the REST API, session sweeper, and store backend.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::{AppConfig, StoreBackend};
use dao::leaderboard_store::LeaderboardStore;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    let port = config.port;
    let cors = cors_layer(&config);

    let store = connect_store(&config).await?;
    let app_state = AppState::new(store, config);

    // Expired sessions are reaped in the background for the whole server lifetime.
    let sweeper = tokio::spawn(services::session_sweeper::run(app_state.clone()));

    let app = build_router(app_state, cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    sweeper.abort();

    Ok(())
}

/// Connect the persistence backend selected by `STORE_BACKEND`.
///
/// Each adapter lives behind a cargo feature, so a build that left one out
/// fails here with a clear message instead of a broken route later.
async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn LeaderboardStore>> {
    match config.backend {
        #[cfg(feature = "mongo-store")]
        StoreBackend::Mongodb => {
            use dao::leaderboard_store::mongodb::{MongoConfig, MongoLeaderboardStore};

            let mongo_config = MongoConfig::from_env().await?;
            let store = MongoLeaderboardStore::connect(mongo_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mongo-store"))]
        StoreBackend::Mongodb => {
            anyhow::bail!("STORE_BACKEND=mongodb but this build lacks the `mongo-store` feature")
        }
        #[cfg(feature = "couch-store")]
        StoreBackend::Couchdb => {
            use dao::leaderboard_store::couchdb::{CouchConfig, CouchLeaderboardStore};

            let couch_config = CouchConfig::from_env()?;
            let store = CouchLeaderboardStore::connect(couch_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "couch-store"))]
        StoreBackend::Couchdb => {
            anyhow::bail!("STORE_BACKEND=couchdb but this build lacks the `couch-store` feature")
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: state::SharedState, cors: CorsLayer) -> Router<()> {
    routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the CORS layer from configuration.
///
/// With `CORS_ORIGIN` set the layer allows exactly those origins and lets
/// credentialed requests through, which the session cookie needs. Without it
/// the layer stays permissive for local development.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let Some(origins) = config.cors_origins.as_deref() else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(routes::API_KEY_HEADER),
        ])
        .allow_credentials(true)
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

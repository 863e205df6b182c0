//! Application-level configuration pulled from the environment at boot.

use std::env;

use tracing::warn;

const PORT_ENV: &str = "PORT";
const PORT_FALLBACK_ENV: &str = "SERVER_PORT";
const DEFAULT_PORT: u16 = 8080;
const BACKEND_ENV: &str = "STORE_BACKEND";
const CORS_ORIGIN_ENV: &str = "CORS_ORIGIN";
const API_KEY_ENV: &str = "API_KEY";
const APP_ENV: &str = "APP_ENV";

/// Which persistence adapter to wire in at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Direct driver connection to a MongoDB deployment.
    Mongodb,
    /// CouchDB reached over its HTTP document API.
    Couchdb,
}

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port, from `PORT` or `SERVER_PORT`.
    pub port: u16,
    /// Persistence backend selected once at startup.
    pub backend: StoreBackend,
    /// Exact-origin CORS allow-list; `None` means permissive.
    pub cors_origins: Option<Vec<String>>,
    /// Shared secret gating the `/api` routes; `None` disables the gate.
    pub api_key: Option<String>,
    /// Whether cookies should carry the `Secure` attribute.
    pub production: bool,
}

impl AppConfig {
    /// Read every knob once. Unknown values fall back with a warning rather
    /// than aborting startup.
    pub fn from_env() -> Self {
        let port = env::var(PORT_ENV)
            .or_else(|_| env::var(PORT_FALLBACK_ENV))
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let backend = parse_backend(env::var(BACKEND_ENV).ok().as_deref());

        let cors_origins = env::var(CORS_ORIGIN_ENV)
            .ok()
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty());

        let api_key = env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty());

        let production =
            env::var(APP_ENV).is_ok_and(|value| value.eq_ignore_ascii_case("production"));

        Self {
            port,
            backend,
            cors_origins,
            api_key,
            production,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backend: StoreBackend::Mongodb,
            cors_origins: None,
            api_key: None,
            production: false,
        }
    }
}

fn parse_backend(value: Option<&str>) -> StoreBackend {
    match value {
        None => StoreBackend::Mongodb,
        Some(raw) if raw.eq_ignore_ascii_case("mongodb") => StoreBackend::Mongodb,
        Some(raw) if raw.eq_ignore_ascii_case("couchdb") => StoreBackend::Couchdb,
        Some(other) => {
            warn!(value = other, "unknown STORE_BACKEND; defaulting to mongodb");
            StoreBackend::Mongodb
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}

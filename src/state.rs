use std::sync::Arc;

use crate::{config::AppConfig, dao::leaderboard_store::LeaderboardStore};

/// Cheaply cloneable handle to the shared application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the persistence handle plus the immutable
/// runtime configuration captured at boot.
pub struct AppState {
    store: Arc<dyn LeaderboardStore>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(store: Arc<dyn LeaderboardStore>, config: AppConfig) -> SharedState {
        Arc::new(Self { store, config })
    }

    /// Handle to the configured leaderboard store.
    pub fn store(&self) -> Arc<dyn LeaderboardStore> {
        Arc::clone(&self.store)
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

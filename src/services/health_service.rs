use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the store and report `ok` or `degraded`. Never fails the request;
/// an unreachable store is a status, not an error.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if let Err(err) = state.store().health_check().await {
        warn!(error = %err, "storage health check failed");
        return HealthResponse::degraded();
    }

    HealthResponse::ok()
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::SystemTime};

    use futures::future::BoxFuture;
    use uuid::Uuid;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            leaderboard_store::{LeaderboardStore, memory::MemoryLeaderboardStore},
            models::{ScoreEntity, SessionEntity},
            storage::{StorageError, StorageResult},
        },
        state::AppState,
    };

    #[tokio::test]
    async fn reports_ok_when_the_store_answers() {
        let state = AppState::new(
            Arc::new(MemoryLeaderboardStore::new()),
            AppConfig::default(),
        );

        assert_eq!(health_status(&state).await.status, "ok");
    }

    #[derive(Debug, thiserror::Error)]
    #[error("probe refused")]
    struct ProbeRefused;

    /// Store whose probe always fails; no other operation is reached in this
    /// test.
    struct UnhealthyStore;

    impl LeaderboardStore for UnhealthyStore {
        fn insert_session(&self, _: SessionEntity) -> BoxFuture<'static, StorageResult<()>> {
            unimplemented!()
        }
        fn consume_session(
            &self,
            _: Uuid,
            _: SystemTime,
        ) -> BoxFuture<'static, StorageResult<bool>> {
            unimplemented!()
        }
        fn delete_expired_sessions(&self, _: SystemTime) -> BoxFuture<'static, StorageResult<u64>> {
            unimplemented!()
        }
        fn insert_score(&self, _: ScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
            unimplemented!()
        }
        fn top_scores(&self, _: usize) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
            unimplemented!()
        }
        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Err(StorageError::backend(ProbeRefused)) })
        }
    }

    #[tokio::test]
    async fn reports_degraded_when_the_probe_fails() {
        let state = AppState::new(Arc::new(UnhealthyStore), AppConfig::default());

        assert_eq!(health_status(&state).await.status, "degraded");
    }
}

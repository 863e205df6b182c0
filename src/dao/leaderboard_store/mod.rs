#[cfg(feature = "couch-store")]
pub mod couchdb;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use std::time::SystemTime;

use crate::dao::models::{ScoreEntity, SessionEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for game sessions and scores.
///
/// Implementations must make `consume_session` a single atomic conditional
/// delete: with two concurrent calls for the same id, at most one may report
/// `true`. Everything else is plain reads and appends.
pub trait LeaderboardStore: Send + Sync {
    /// Persist a freshly issued session row.
    fn insert_session(&self, session: SessionEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Atomically delete the session iff it exists and is not expired at
    /// `now`; report whether a row was actually removed.
    fn consume_session(&self, id: Uuid, now: SystemTime)
    -> BoxFuture<'static, StorageResult<bool>>;
    /// Remove every session whose expiry is at or before `now`, returning the
    /// number of rows deleted. Used by the background sweep only.
    fn delete_expired_sessions(&self, now: SystemTime) -> BoxFuture<'static, StorageResult<u64>>;
    /// Append a validated score row.
    fn insert_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Highest scores first, ties broken by earlier `created_at`, at most
    /// `limit` rows.
    fn top_scores(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>>;
    /// Cheap connectivity probe backing the health endpoint.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Rank scores the way `top_scores` promises: score descending, then earlier
/// submission first. Backends that cannot sort server-side call this on the
/// rows they fetched.
pub fn rank_scores(scores: &mut Vec<ScoreEntity>, limit: usize) {
    scores.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    scores.truncate(limit);
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory store double for service-level tests.

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::SystemTime;

    use futures::future::BoxFuture;
    use uuid::Uuid;

    use super::{LeaderboardStore, rank_scores};
    use crate::dao::models::{ScoreEntity, SessionEntity};
    use crate::dao::storage::{StorageError, StorageResult};

    #[derive(Debug, thiserror::Error)]
    #[error("simulated storage outage")]
    struct SimulatedOutage;

    #[derive(Default)]
    struct MemoryInner {
        sessions: HashMap<Uuid, SessionEntity>,
        scores: Vec<ScoreEntity>,
        fail_writes: bool,
    }

    /// Store double keeping rows behind a single mutex; the locked
    /// remove-if-valid in `consume_session` mirrors the adapters' atomic
    /// conditional delete.
    #[derive(Clone, Default)]
    pub struct MemoryLeaderboardStore {
        inner: Arc<Mutex<MemoryInner>>,
    }

    impl MemoryLeaderboardStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make subsequent writes fail, simulating a storage outage.
        pub fn fail_writes(&self) {
            self.inner.lock().unwrap().fail_writes = true;
        }

        pub fn session_count(&self) -> usize {
            self.inner.lock().unwrap().sessions.len()
        }

        pub fn score_count(&self) -> usize {
            self.inner.lock().unwrap().scores.len()
        }
    }

    impl LeaderboardStore for MemoryLeaderboardStore {
        fn insert_session(&self, session: SessionEntity) -> BoxFuture<'static, StorageResult<()>> {
            let store = self.clone();
            Box::pin(async move {
                let mut inner = store.inner.lock().unwrap();
                if inner.fail_writes {
                    return Err(StorageError::backend(SimulatedOutage));
                }
                inner.sessions.insert(session.id, session);
                Ok(())
            })
        }

        fn consume_session(
            &self,
            id: Uuid,
            now: SystemTime,
        ) -> BoxFuture<'static, StorageResult<bool>> {
            let store = self.clone();
            Box::pin(async move {
                let mut inner = store.inner.lock().unwrap();
                let valid = inner
                    .sessions
                    .get(&id)
                    .is_some_and(|session| session.expires_at > now);
                if valid {
                    inner.sessions.remove(&id);
                }
                Ok(valid)
            })
        }

        fn delete_expired_sessions(
            &self,
            now: SystemTime,
        ) -> BoxFuture<'static, StorageResult<u64>> {
            let store = self.clone();
            Box::pin(async move {
                let mut inner = store.inner.lock().unwrap();
                let before = inner.sessions.len();
                inner.sessions.retain(|_, session| session.expires_at > now);
                Ok((before - inner.sessions.len()) as u64)
            })
        }

        fn insert_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
            let store = self.clone();
            Box::pin(async move {
                let mut inner = store.inner.lock().unwrap();
                if inner.fail_writes {
                    return Err(StorageError::backend(SimulatedOutage));
                }
                inner.scores.push(score);
                Ok(())
            })
        }

        fn top_scores(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
            let store = self.clone();
            Box::pin(async move {
                let mut scores = store.inner.lock().unwrap().scores.clone();
                rank_scores(&mut scores, limit);
                Ok(scores)
            })
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }
}

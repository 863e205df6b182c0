use std::time::{Duration, SystemTime};

use tracing::debug;
use uuid::Uuid;

use crate::{dao::models::SessionEntity, error::ServiceError, state::SharedState};

/// How long an issued session stays valid.
pub const SESSION_TTL: Duration = Duration::from_secs(3600);

/// Rejection message shared by every failure mode so callers cannot tell an
/// absent token from an expired or already-spent one.
pub(crate) const INVALID_SESSION_MESSAGE: &str = "invalid or expired game session";

/// Open a new single-use game session and return its token.
pub async fn start_session(state: &SharedState) -> Result<Uuid, ServiceError> {
    let session = SessionEntity {
        id: Uuid::new_v4(),
        expires_at: SystemTime::now() + SESSION_TTL,
    };
    let id = session.id;

    state.store().insert_session(session).await?;
    debug!(session = %id, "opened game session");
    Ok(id)
}

/// Validate and consume a session token in one step.
///
/// The store performs a single conditional delete, so of two racing
/// submissions carrying the same token exactly one can succeed; the loser is
/// told the session is invalid, same as an expired or unknown token.
pub async fn validate_and_consume(state: &SharedState, token: Uuid) -> Result<(), ServiceError> {
    let consumed = state
        .store()
        .consume_session(token, SystemTime::now())
        .await?;

    if consumed {
        Ok(())
    } else {
        Err(ServiceError::Unauthenticated(
            INVALID_SESSION_MESSAGE.into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::leaderboard_store::{LeaderboardStore, memory::MemoryLeaderboardStore},
        state::AppState,
    };

    fn state_with(store: &MemoryLeaderboardStore) -> SharedState {
        AppState::new(Arc::new(store.clone()), AppConfig::default())
    }

    #[tokio::test]
    async fn start_session_persists_a_row() {
        let store = MemoryLeaderboardStore::new();
        let state = state_with(&store);

        start_session(&state).await.unwrap();

        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn a_token_can_be_consumed_exactly_once() {
        let store = MemoryLeaderboardStore::new();
        let state = state_with(&store);

        let token = start_session(&state).await.unwrap();

        validate_and_consume(&state, token).await.unwrap();
        assert_eq!(store.session_count(), 0);

        let second = validate_and_consume(&state, token).await.unwrap_err();
        assert!(matches!(second, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn an_unknown_token_is_rejected() {
        let store = MemoryLeaderboardStore::new();
        let state = state_with(&store);

        let err = validate_and_consume(&state, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn an_expired_token_is_rejected_even_before_the_sweep() {
        let store = MemoryLeaderboardStore::new();
        let state = state_with(&store);

        let expired = SessionEntity {
            id: Uuid::new_v4(),
            expires_at: SystemTime::now() - Duration::from_secs(1),
        };
        store.insert_session(expired.clone()).await.unwrap();

        let err = validate_and_consume(&state, expired.id).await.unwrap_err();
        match err {
            ServiceError::Unauthenticated(message) => {
                assert_eq!(message, INVALID_SESSION_MESSAGE);
            }
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn storage_failures_surface_as_storage_errors() {
        let store = MemoryLeaderboardStore::new();
        let state = state_with(&store);
        store.fail_writes();

        let err = start_session(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[tokio::test]
    async fn concurrent_consumers_of_one_token_produce_a_single_winner() {
        let store = MemoryLeaderboardStore::new();
        let state = state_with(&store);

        let token = start_session(&state).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                validate_and_consume(&state, token).await
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(store.session_count(), 0);
    }
}

use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::ScoreEntity,
    dto::score::{LeaderboardEntry, ScoreRecord, SubmitScoreRequest},
    error::ServiceError,
    services::session_service,
    state::SharedState,
};

/// Maximum number of rows the leaderboard ever returns.
pub const LEADERBOARD_LIMIT: usize = 10;

/// Validate a submission, consume its session, and persist the score.
///
/// Input checks run before the session store is touched, so a request that
/// would be rejected anyway cannot burn a valid token. The cookie value
/// arrives raw; a missing cookie and an unparseable one are both turned away
/// without asking the store anything.
pub async fn submit_score(
    state: &SharedState,
    request: SubmitScoreRequest,
    session_token: Option<&str>,
) -> Result<ScoreRecord, ServiceError> {
    request.validate()?;

    let raw_token = session_token.ok_or_else(|| {
        ServiceError::Unauthenticated("missing `gameSession` cookie".into())
    })?;

    // A malformed token gets the same answer as an unknown one.
    let token = Uuid::parse_str(raw_token).map_err(|_| {
        ServiceError::Unauthenticated(session_service::INVALID_SESSION_MESSAGE.into())
    })?;

    session_service::validate_and_consume(state, token).await?;

    let entity = ScoreEntity {
        id: Uuid::new_v4(),
        username: request.username,
        score: request.score,
        created_at: SystemTime::now(),
    };

    state.store().insert_score(entity.clone()).await?;
    info!(username = %entity.username, score = entity.score, "recorded score");

    Ok(entity.into())
}

/// Top scores, highest first; equal scores rank the earlier submission first.
pub async fn leaderboard(state: &SharedState) -> Result<Vec<LeaderboardEntry>, ServiceError> {
    let scores = state.store().top_scores(LEADERBOARD_LIMIT).await?;
    Ok(scores.into_iter().map(Into::into).collect())
}

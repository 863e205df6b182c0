use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::{
    dto::score::{LeaderboardEntry, ScoreRecord, SubmitScoreRequest},
    error::AppError,
    routes::session::SESSION_COOKIE,
    services::score_service,
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/api/score",
    tag = "scores",
    request_body = SubmitScoreRequest,
    responses(
        (status = 200, description = "Score recorded; the session cookie is cleared", body = ScoreRecord),
        (status = 400, description = "Username or score failed validation"),
        (status = 401, description = "Missing, invalid, expired, or already-used game session"),
        (status = 500, description = "Score could not be persisted"),
    )
)]
/// Record a score for the session carried by the `gameSession` cookie.
pub async fn submit_score(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(request): Json<SubmitScoreRequest>,
) -> Result<(CookieJar, Json<ScoreRecord>), AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned());

    let record = score_service::submit_score(&state, request, token.as_deref()).await?;

    // The token is spent; clear the cookie on the success path only, so a
    // rejected submission keeps whatever the client was holding.
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));

    Ok((jar, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "scores",
    responses(
        (status = 200, description = "Top scores, highest first", body = [LeaderboardEntry]),
        (status = 500, description = "Scores could not be read"),
    )
)]
/// Return the top-10 leaderboard.
pub async fn leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    Ok(Json(score_service::leaderboard(&state).await?))
}

/// Configure the score routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/api/score", post(submit_score))
        .route("/api/leaderboard", get(leaderboard))
}

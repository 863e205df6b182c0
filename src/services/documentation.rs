use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Castle Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::session::start_game,
        crate::routes::score::submit_score,
        crate::routes::score::leaderboard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::session::StartSessionResponse,
            crate::dto::score::SubmitScoreRequest,
            crate::dto::score::ScoreRecord,
            crate::dto::score::LeaderboardEntry,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Game session lifecycle"),
        (name = "scores", description = "Score submission and the leaderboard"),
    )
)]
pub struct ApiDoc;

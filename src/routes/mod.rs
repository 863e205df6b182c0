use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::{error::AppError, state::SharedState};

pub mod docs;
pub mod health;
pub mod score;
pub mod session;

/// Header carrying the shared API key for the gated `/api` routes.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Compose all route trees, wiring in shared state and documentation routes.
///
/// The API-key gate sits on the `/api` subtree only; health and docs stay
/// open.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = session::router()
        .merge(score::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    let open_router = health::router().merge(docs::router(state.clone()));

    api_router.merge(open_router).with_state(state)
}

/// Shared-secret gate. Pass-through when no key is configured; otherwise the
/// `x-api-key` header must match exactly.
async fn require_api_key(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config().api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if key == expected => Ok(next.run(req).await),
        _ => Err(AppError::Unauthorized("Invalid or missing API key".into())),
    }
}

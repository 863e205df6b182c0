use axum::{Json, Router, extract::State, routing::post};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::{
    dto::session::StartSessionResponse, error::AppError, services::session_service,
    state::SharedState,
};

/// Name of the cookie carrying the single-use session token.
pub const SESSION_COOKIE: &str = "gameSession";

#[utoipa::path(
    post,
    path = "/api/game/start",
    tag = "game",
    responses(
        (status = 200, description = "Session opened, token set as the `gameSession` cookie", body = StartSessionResponse),
        (status = 401, description = "API key required but missing or wrong"),
        (status = 500, description = "Session could not be persisted"),
    )
)]
/// Open a new game session and hand the token to the client as a cookie.
pub async fn start_game(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<StartSessionResponse>), AppError> {
    let id = session_service::start_session(&state).await?;
    let jar = jar.add(session_cookie(id, state.config().production));

    Ok((jar, Json(StartSessionResponse::new(id))))
}

/// Build the session cookie. `Secure` is attached only in production so the
/// flow still works over plain HTTP during local development.
fn session_cookie(id: Uuid, production: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(production)
        .path("/")
        .max_age(time::Duration::seconds(
            session_service::SESSION_TTL.as_secs() as i64,
        ))
        .build()
}

/// Configure the game-session routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/api/game/start", post(start_game))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_session_cookie_carries_the_expected_attributes() {
        let id = Uuid::new_v4();
        let cookie = session_cookie(id, false);

        assert_eq!(cookie.name(), "gameSession");
        assert_eq!(cookie.value(), id.to_string());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }

    #[test]
    fn the_secure_attribute_follows_the_production_flag() {
        let cookie = session_cookie(Uuid::new_v4(), true);
        assert_eq!(cookie.secure(), Some(true));
    }
}

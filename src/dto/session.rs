use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Body returned when a new game session has been opened.
#[derive(Debug, Serialize, ToSchema)]
pub struct StartSessionResponse {
    /// Always `true`; failures surface as error bodies instead.
    pub success: bool,
    /// Session token, also carried by the `gameSession` cookie.
    #[serde(rename = "sessionId")]
    pub session_id: Uuid,
}

impl StartSessionResponse {
    /// Wrap a freshly issued session token.
    pub fn new(session_id: Uuid) -> Self {
        Self {
            success: true,
            session_id,
        }
    }
}

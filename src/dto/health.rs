use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `"ok"` when the store answers the probe, `"degraded"` otherwise.
    #[schema(example = "ok")]
    pub status: String,
}

impl HealthResponse {
    /// The store answered the connectivity probe.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_owned(),
        }
    }

    /// The store is unreachable; the process itself keeps serving.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_owned(),
        }
    }
}

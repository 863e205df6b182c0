use super::error::{CouchDaoError, CouchResult};

/// Connection settings for the CouchDB backend. Credentials are attached
/// only when both halves are present.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    /// Server base URL without a trailing slash.
    pub base_url: String,
    /// Database holding session and score documents.
    pub database: String,
    /// Optional basic-auth username/password pair.
    pub credentials: Option<(String, String)>,
}

impl CouchConfig {
    /// Read `COUCH_BASE_URL` / `COUCH_DB` (required) and the optional
    /// `COUCH_USERNAME` / `COUCH_PASSWORD` pair.
    pub fn from_env() -> CouchResult<Self> {
        let base_url =
            std::env::var("COUCH_BASE_URL").map_err(|_| CouchDaoError::MissingEnvVar {
                var: "COUCH_BASE_URL",
            })?;
        let database = std::env::var("COUCH_DB")
            .map_err(|_| CouchDaoError::MissingEnvVar { var: "COUCH_DB" })?;

        let credentials = std::env::var("COUCH_USERNAME")
            .ok()
            .zip(std::env::var("COUCH_PASSWORD").ok());

        Ok(Self {
            base_url,
            database,
            credentials,
        })
    }
}

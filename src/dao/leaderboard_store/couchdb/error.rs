//! Failure taxonomy for the CouchDB adapter.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for CouchDB adapter operations.
pub type CouchResult<T> = Result<T, CouchDaoError>;

/// Failures raised while talking to CouchDB, one variant per failure site.
#[derive(Debug, Error)]
pub enum CouchDaoError {
    /// A required connection variable was absent from the environment.
    #[error("missing CouchDB environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build CouchDB client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// Probing the target database failed at the transport level.
    #[error("failed to query CouchDB database `{database}`")]
    DatabaseQuery {
        database: String,
        #[source]
        source: reqwest::Error,
    },
    /// Creating the missing database failed.
    #[error("failed to create CouchDB database `{database}`")]
    DatabaseCreate {
        database: String,
        #[source]
        source: reqwest::Error,
    },
    /// A database-level call answered with a status this adapter does not handle.
    #[error("unexpected CouchDB database response status {status} for `{database}`")]
    DatabaseStatus {
        database: String,
        status: StatusCode,
    },
    /// A document request never made it to the server.
    #[error("failed to send CouchDB request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// A document endpoint answered with an unexpected status.
    #[error("unexpected CouchDB response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// A response body was not the JSON it should have been.
    #[error("failed to decode CouchDB response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// A fetched JSON value did not match the expected document shape.
    #[error("failed to deserialize CouchDB value for `{path}`")]
    DeserializeValue {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// A fetched document came back without its revision marker.
    #[error("document `{doc_id}` is missing its `_rev` field")]
    MissingRev { doc_id: String },
    /// Failed to parse a document ID back into a UUID.
    #[error("invalid document ID `{doc_id}`: {kind}")]
    InvalidDocId { doc_id: String, kind: &'static str },
}

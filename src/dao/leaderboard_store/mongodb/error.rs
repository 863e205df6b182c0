use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures raised by the MongoDB adapter, one variant per operation.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to insert session `{id}`")]
    InsertSession {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to consume session `{id}`")]
    ConsumeSession {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to sweep expired sessions")]
    SweepSessions {
        #[source]
        source: MongoError,
    },
    #[error("failed to insert score `{id}`")]
    InsertScore {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list scores")]
    ListScores {
        #[source]
        source: MongoError,
    },
}

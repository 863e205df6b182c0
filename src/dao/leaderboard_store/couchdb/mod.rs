pub mod config;
mod error;
mod models;
pub mod store;

pub use config::CouchConfig;
pub use error::CouchDaoError;
pub use store::CouchLeaderboardStore;

use crate::dao::storage::StorageError;

impl From<CouchDaoError> for StorageError {
    fn from(err: CouchDaoError) -> Self {
        StorageError::backend(err)
    }
}

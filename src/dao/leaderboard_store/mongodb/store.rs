use std::time::SystemTime;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Collection, Database,
    bson::{DateTime, doc},
    options::IndexOptions,
};
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoScoreDocument, MongoSessionDocument, uuid_as_binary},
};
use crate::dao::{
    leaderboard_store::LeaderboardStore,
    models::{ScoreEntity, SessionEntity},
    storage::StorageResult,
};

const SESSION_COLLECTION_NAME: &str = "sessions";
const SCORE_COLLECTION_NAME: &str = "scores";

/// Store backed by a MongoDB deployment. Session consumption maps to
/// `findOneAndDelete`, which the server executes atomically, so two racing
/// submissions with one token can never both win.
#[derive(Clone)]
pub struct MongoLeaderboardStore {
    database: Database,
}

impl MongoLeaderboardStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (_client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let store = Self { database };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let session_index = mongodb::IndexModel::builder()
            .keys(doc! {"expires_at": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("session_expiry_idx".to_owned()))
                    .build(),
            )
            .build();

        self.sessions()
            .create_index(session_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: SESSION_COLLECTION_NAME,
                index: "expires_at",
                source,
            })?;

        let score_index = mongodb::IndexModel::builder()
            .keys(doc! {"score": -1, "created_at": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("score_rank_idx".to_owned()))
                    .build(),
            )
            .build();

        self.scores()
            .create_index(score_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: SCORE_COLLECTION_NAME,
                index: "score,created_at",
                source,
            })?;

        Ok(())
    }

    fn sessions(&self) -> Collection<MongoSessionDocument> {
        self.database
            .collection::<MongoSessionDocument>(SESSION_COLLECTION_NAME)
    }

    fn scores(&self) -> Collection<MongoScoreDocument> {
        self.database
            .collection::<MongoScoreDocument>(SCORE_COLLECTION_NAME)
    }

    async fn insert_session(&self, session: SessionEntity) -> MongoResult<()> {
        let id = session.id;
        let document: MongoSessionDocument = session.into();
        self.sessions()
            .insert_one(document)
            .await
            .map_err(|source| MongoDaoError::InsertSession { id, source })?;
        Ok(())
    }

    /// Single conditional delete: only a row that still exists and has not
    /// expired at `now` can be removed, and only one caller sees it.
    async fn consume_session(&self, id: Uuid, now: SystemTime) -> MongoResult<bool> {
        let filter = doc! {
            "_id": uuid_as_binary(id),
            "expires_at": { "$gt": DateTime::from_system_time(now) },
        };

        let removed = self
            .sessions()
            .find_one_and_delete(filter)
            .await
            .map_err(|source| MongoDaoError::ConsumeSession { id, source })?;

        Ok(removed.is_some())
    }

    async fn delete_expired_sessions(&self, now: SystemTime) -> MongoResult<u64> {
        let filter = doc! {
            "expires_at": { "$lte": DateTime::from_system_time(now) },
        };

        let result = self
            .sessions()
            .delete_many(filter)
            .await
            .map_err(|source| MongoDaoError::SweepSessions { source })?;

        Ok(result.deleted_count)
    }

    async fn insert_score(&self, score: ScoreEntity) -> MongoResult<()> {
        let id = score.id;
        let document: MongoScoreDocument = score.into();
        self.scores()
            .insert_one(document)
            .await
            .map_err(|source| MongoDaoError::InsertScore { id, source })?;
        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> MongoResult<Vec<ScoreEntity>> {
        let documents: Vec<MongoScoreDocument> = self
            .scores()
            .find(doc! {})
            .sort(doc! {"score": -1, "created_at": 1})
            .limit(limit as i64)
            .await
            .map_err(|source| MongoDaoError::ListScores { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListScores { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn ping(&self) -> MongoResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }
}

impl LeaderboardStore for MongoLeaderboardStore {
    fn insert_session(&self, session: SessionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_session(session).await.map_err(Into::into) })
    }

    fn consume_session(
        &self,
        id: Uuid,
        now: SystemTime,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.consume_session(id, now).await.map_err(Into::into) })
    }

    fn delete_expired_sessions(&self, now: SystemTime) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete_expired_sessions(now)
                .await
                .map_err(Into::into)
        })
    }

    fn insert_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_score(score).await.map_err(Into::into) })
    }

    fn top_scores(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.top_scores(limit).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}

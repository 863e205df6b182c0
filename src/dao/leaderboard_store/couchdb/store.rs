use std::{sync::Arc, time::SystemTime};

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::from_value;
use uuid::Uuid;

use crate::dao::{
    leaderboard_store::{LeaderboardStore, rank_scores},
    models::{ScoreEntity, SessionEntity},
    storage::StorageResult,
};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{
        AllDocsResponse, CouchScoreDocument, CouchSessionDocument, END_SUFFIX, SCORE_PREFIX,
        SESSION_PREFIX, score_doc_id, session_doc_id,
    },
};

/// Store backed by CouchDB over plain HTTP. Consumption leans on MVCC: the
/// conditional delete carries the fetched `_rev`, so of two racing consumers
/// exactly one delete lands and the loser sees a conflict.
#[derive(Clone)]
pub struct CouchLeaderboardStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchLeaderboardStore {
    /// Establish a connection to CouchDB and ensure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let base_url = Arc::<str>::from(config.base_url.trim_end_matches('/'));
        let database = Arc::<str>::from(config.database);
        let auth = config
            .credentials
            .map(|(user, pass)| (Arc::<str>::from(user), Arc::<str>::from(pass)));

        let store = Self {
            client,
            base_url,
            database,
            auth,
        };

        store.ensure_database().await?;
        Ok(store)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}/{}", self.base_url, self.database, path);
        let builder = self.client.request(method, url);
        if let Some((ref user, ref pass)) = self.auth {
            builder.basic_auth(user.as_ref(), Some(pass.as_ref()))
        } else {
            builder
        }
    }

    async fn database_status(&self) -> CouchResult<StatusCode> {
        let url = format!("{}/{}", self.base_url, self.database);
        let mut builder = self.client.get(&url);
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user.as_ref(), Some(pass.as_ref()));
        }

        let response = builder
            .send()
            .await
            .map_err(|source| CouchDaoError::DatabaseQuery {
                database: self.database.to_string(),
                source,
            })?;

        Ok(response.status())
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.to_string();

        match self.database_status().await? {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let url = format!("{}/{}", self.base_url, self.database);
                let mut builder = self.client.put(&url);
                if let Some((ref user, ref pass)) = self.auth {
                    builder = builder.basic_auth(user.as_ref(), Some(pass.as_ref()));
                }
                let create =
                    builder
                        .send()
                        .await
                        .map_err(|source| CouchDaoError::DatabaseCreate {
                            database: database.clone(),
                            source,
                        })?;
                if create.status().is_success() {
                    Ok(())
                } else {
                    Err(CouchDaoError::DatabaseStatus {
                        database,
                        status: create.status(),
                    })
                }
            }
            other => Err(CouchDaoError::DatabaseStatus {
                database,
                status: other,
            }),
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, doc_id)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response.json::<T>().await.map(Some).map_err(|source| {
                    CouchDaoError::DecodeResponse {
                        path: doc_id.to_string(),
                        source,
                    }
                })
            }
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<()>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .request(Method::PUT, doc_id)
            .json(document)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: response.status(),
            })
        }
    }

    /// Revision-guarded delete. `false` means CouchDB turned the delete away
    /// with 404 or 409, i.e. another writer got to the document first.
    async fn delete_document(&self, doc_id: &str, rev: &str) -> CouchResult<bool> {
        let response = self
            .request(Method::DELETE, doc_id)
            .query(&[("rev", rev)])
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => Ok(false),
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn list_documents<T>(&self, prefix: &str) -> CouchResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        const ALL_DOCS: &str = "_all_docs";
        let query = [
            ("include_docs", "true".to_string()),
            ("startkey", format!("\"{}\"", prefix)),
            ("endkey", format!("\"{}{}\"", prefix, END_SUFFIX)),
        ];

        let response = self
            .request(Method::GET, ALL_DOCS)
            .query(&query)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: ALL_DOCS.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: ALL_DOCS.to_string(),
                status: response.status(),
            });
        }

        let payload = response.json::<AllDocsResponse>().await.map_err(|source| {
            CouchDaoError::DecodeResponse {
                path: ALL_DOCS.to_string(),
                source,
            }
        })?;

        let mut documents = Vec::new();
        for row in payload.rows {
            if let Some(doc) = row.doc {
                let parsed = from_value(doc).map_err(|source| CouchDaoError::DeserializeValue {
                    path: ALL_DOCS.to_string(),
                    source,
                })?;
                documents.push(parsed);
            }
        }

        Ok(documents)
    }

    async fn insert_session(&self, session: SessionEntity) -> CouchResult<()> {
        let document = CouchSessionDocument::from(session);
        let doc_id = document.id.clone();
        self.put_document(&doc_id, &document).await
    }

    /// Fetch, check expiry locally, then delete with the fetched revision.
    /// An expired document is left for the sweep; a 404/409 on the delete
    /// means another consumer won the race.
    async fn consume_session(&self, id: Uuid, now: SystemTime) -> CouchResult<bool> {
        let doc_id = session_doc_id(id);
        let Some(document) = self.get_document::<CouchSessionDocument>(&doc_id).await? else {
            return Ok(false);
        };

        if document.session.expires_at <= now {
            return Ok(false);
        }

        let rev = document.rev.ok_or(CouchDaoError::MissingRev {
            doc_id: doc_id.clone(),
        })?;

        self.delete_document(&doc_id, &rev).await
    }

    async fn delete_expired_sessions(&self, now: SystemTime) -> CouchResult<u64> {
        let documents = self
            .list_documents::<CouchSessionDocument>(SESSION_PREFIX)
            .await?;

        let mut removed = 0;
        for document in documents {
            if document.session.expires_at > now {
                continue;
            }
            let Some(rev) = document.rev else {
                continue;
            };
            if self.delete_document(&document.id, &rev).await? {
                removed += 1;
            }
        }

        Ok(removed)
    }

    async fn insert_score(&self, score: ScoreEntity) -> CouchResult<()> {
        let document = CouchScoreDocument::from(score);
        let doc_id = document.id.clone();
        self.put_document(&doc_id, &document).await
    }

    async fn top_scores(&self, limit: usize) -> CouchResult<Vec<ScoreEntity>> {
        let documents = self
            .list_documents::<CouchScoreDocument>(SCORE_PREFIX)
            .await?;

        let mut scores = documents
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<ScoreEntity>, _>>()?;

        rank_scores(&mut scores, limit);
        Ok(scores)
    }

    async fn health_probe(&self) -> CouchResult<()> {
        let status = self.database_status().await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::DatabaseStatus {
                database: self.database.to_string(),
                status,
            })
        }
    }
}

impl LeaderboardStore for CouchLeaderboardStore {
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
        Box::pin(async move { store.health_probe().await.map_err(Into::into) })
    }
}

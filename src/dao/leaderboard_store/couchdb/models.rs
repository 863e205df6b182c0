use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::CouchDaoError;
use crate::dao::models::{ScoreEntity, SessionEntity};

pub const SESSION_PREFIX: &str = "session::";
pub const SCORE_PREFIX: &str = "score::";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    #[serde(default)]
    pub doc: Option<Value>,
}

/// Session document; the token UUID rides in the `_id` behind the prefix so
/// key-range scans over `session::` find every live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchSessionDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub session: SessionBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionBody {
    pub expires_at: SystemTime,
}

impl From<SessionEntity> for CouchSessionDocument {
    fn from(value: SessionEntity) -> Self {
        Self {
            id: session_doc_id(value.id),
            rev: None,
            session: SessionBody {
                expires_at: value.expires_at,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchScoreDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub score: ScoreBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBody {
    pub username: String,
    pub score: i32,
    pub created_at: SystemTime,
}

impl From<ScoreEntity> for CouchScoreDocument {
    fn from(value: ScoreEntity) -> Self {
        Self {
            id: score_doc_id(value.id),
            rev: None,
            score: ScoreBody {
                username: value.username,
                score: value.score,
                created_at: value.created_at,
            },
        }
    }
}

impl TryFrom<CouchScoreDocument> for ScoreEntity {
    type Error = CouchDaoError;

    fn try_from(doc: CouchScoreDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: extract_uuid(&doc.id)?,
            username: doc.score.username,
            score: doc.score.score,
            created_at: doc.score.created_at,
        })
    }
}

pub fn session_doc_id(id: Uuid) -> String {
    format!("{}{}", SESSION_PREFIX, id)
}

pub fn score_doc_id(id: Uuid) -> String {
    format!("{}{}", SCORE_PREFIX, id)
}

pub fn extract_uuid(doc_id: &str) -> Result<Uuid, CouchDaoError> {
    let (_, id) = doc_id
        .split_once("::")
        .ok_or_else(|| CouchDaoError::InvalidDocId {
            doc_id: doc_id.to_string(),
            kind: "missing separator",
        })?;

    Uuid::parse_str(id).map_err(|_| CouchDaoError::InvalidDocId {
        doc_id: doc_id.to_string(),
        kind: "invalid UUID",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_ids_round_trip_through_extract_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(extract_uuid(&session_doc_id(id)).unwrap(), id);
        assert_eq!(extract_uuid(&score_doc_id(id)).unwrap(), id);
    }

    #[test]
    fn extract_uuid_rejects_malformed_ids() {
        assert!(extract_uuid("score").is_err());
        assert!(extract_uuid("score::not-a-uuid").is_err());
    }
}

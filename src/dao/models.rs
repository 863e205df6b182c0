use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Game session row persisted between game-start and score submission.
///
/// A session is valid iff it exists in the store and `expires_at` lies in the
/// future; consumption deletes the row so a token can never be spent twice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionEntity {
    /// Opaque single-use token handed to the client, primary key.
    pub id: Uuid,
    /// Absolute expiry instant (creation time + the session TTL).
    pub expires_at: SystemTime,
}

/// Submitted score persisted by the storage layer.
///
/// Rows are append-only: once written they are never mutated or deleted, only
/// read back for the leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntity {
    /// Server-assigned primary key.
    pub id: Uuid,
    /// Player-chosen display name, 1-10 characters.
    pub username: String,
    /// Achieved score within [0, 1000].
    pub score: i32,
    /// Server-assigned submission timestamp; breaks leaderboard ties
    /// (earlier submission ranks first among equal scores).
    pub created_at: SystemTime,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::ScoreEntity,
    dto::{
        format_system_time,
        validation::{validate_score, validate_username},
    },
};

/// Payload submitted at the end of a game run.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitScoreRequest {
    /// Display name shown on the leaderboard, 1-10 characters.
    pub username: String,
    /// Achieved score, 0-1000 inclusive.
    pub score: i32,
}

impl Validate for SubmitScoreRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_username(&self.username) {
            errors.add("username", e);
        }

        if let Err(e) = validate_score(self.score) {
            errors.add("score", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Persisted score row echoed back after a successful submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreRecord {
    /// Server-assigned row id.
    pub id: Uuid,
    /// Display name as submitted.
    pub username: String,
    /// Recorded score.
    pub score: i32,
    /// RFC 3339 submission timestamp.
    pub created_at: String,
}

impl From<ScoreEntity> for ScoreRecord {
    fn from(entity: ScoreEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            score: entity.score,
            created_at: format_system_time(entity.created_at),
        }
    }
}

/// Single leaderboard row; only what the scoreboard shows, no row id.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// Display name of the submitting player.
    pub username: String,
    /// Recorded score.
    pub score: i32,
    /// RFC 3339 submission timestamp; among equal scores the earlier entry
    /// ranks first.
    pub created_at: String,
}

impl From<ScoreEntity> for LeaderboardEntry {
    fn from(entity: ScoreEntity) -> Self {
        Self {
            username: entity.username,
            score: entity.score,
            created_at: format_system_time(entity.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_well_formed_submission() {
        let request = SubmitScoreRequest {
            username: "player".to_owned(),
            score: 640,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn collects_violations_from_both_fields() {
        let request = SubmitScoreRequest {
            username: String::new(),
            score: 5000,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("score"));
    }
}

/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Score validation, recording, and leaderboard reads.
pub mod score_service;
/// Single-use game-session issuance and consumption.
pub mod session_service;
/// Background removal of expired sessions.
pub mod session_sweeper;

//! Error types for the team draw service
//!
//! Plumbing code propagates `anyhow` errors; domain failures that callers
//! need to tell apart are expressed as [`DrawError`] variants and recovered
//! with `downcast_ref` at the HTTP boundary.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific roster and draw scenarios
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("Invalid team size: {team_size} (must be greater than 0)")]
    InvalidTeamSize { team_size: i64 },

    #[error("Invalid player data: {reason}")]
    InvalidPlayer { reason: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: u64 },

    #[error("No active players to draw teams")]
    NoActivePlayers,

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

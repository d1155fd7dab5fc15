//! Error types for the matchmaking service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific matchmaking scenarios
#[derive(Debug, thiserror::Error)]
pub enum MatchmakingError {
    #[error("AMQP connection failed: {message}")]
    AmqpConnectionFailed { message: String },

    #[error("Invalid queue request: {reason}")]
    InvalidQueueRequest { reason: String },

    #[error("Player not found in queue: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Player already queued: {player_id}")]
    PlayerAlreadyQueued { player_id: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

/// Closed set of reasons why a matchmaking tick produced no match.
///
/// All variants are recoverable by definition: the caller simply re-runs
/// the tick later with a possibly larger pool or more elapsed wait time.
/// These are never wrapped in anyhow context chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NoMatchReason {
    /// Fewer than `2 * team_size` candidates are queued.
    #[error("not enough candidates queued")]
    InsufficientPool,

    /// Role counts cannot satisfy the one-healer-per-team rule and no
    /// fallback timer has elapsed.
    #[error("role composition cannot be balanced")]
    UnbalancedComposition,

    /// Enough candidates were selected, but every team split violates a
    /// composition or class-stacking constraint.
    #[error("no team split satisfies the composition constraints")]
    NoValidPartition,
}

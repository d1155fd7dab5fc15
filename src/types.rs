//! Common types used throughout the matchmaking service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for queued players
pub type PlayerId = String;

/// Unique identifier for formed matches
pub type MatchId = Uuid;

/// Detected combat role of a queued player.
///
/// Melee and Ranged are refinements used only by role classification;
/// everywhere the composition rules care about role, both collapse to DPS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Melee,
    Ranged,
    Healer,
}

impl Role {
    /// True for both DPS refinements.
    pub fn is_dps(&self) -> bool {
        matches!(self, Role::Melee | Role::Ranged)
    }

    pub fn is_healer(&self) -> bool {
        matches!(self, Role::Healer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Melee => write!(f, "melee"),
            Role::Ranged => write!(f, "ranged"),
            Role::Healer => write!(f, "healer"),
        }
    }
}

/// A queued participant eligible for matchmaking.
///
/// The matchmaking core borrows slices of these for the duration of one
/// tick and never mutates them; ownership stays with the queue manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: PlayerId,
    pub role: Role,
    /// Matchmaker rating, used only for imbalance scoring.
    pub rating: u32,
    /// Queue entry timestamp in milliseconds (monotonic, caller-supplied).
    pub joined_at_ms: u64,
    /// Class category for the stacking constraint; 0 means none.
    pub class_tag: u8,
}

/// Output of the candidate selector: an ordered list of exactly
/// `2 * team_size` candidates plus the fallback marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub candidates: Vec<Candidate>,
    /// True when the selection used a no-healer fallback path, meaning
    /// the partitioner must form two all-DPS teams.
    pub all_dps_match: bool,
}

/// Output of the team partitioner: two disjoint index sets over the
/// selected candidate list, each of size `team_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSplit {
    pub team1: Vec<usize>,
    pub team2: Vec<usize>,
    /// Absolute difference of the two teams' summed ratings.
    pub rating_diff: u64,
}

/// Reason why a player left the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveReason {
    Disconnect,
    UserQuit,
    Timeout,
    SystemError,
}

/// AMQP Message Types
/// Request to join the arena queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueRequest {
    pub player_id: PlayerId,
    /// Role declared by the upstream classifier.
    pub role: Role,
    pub rating: u32,
    /// Class category for the stacking constraint; 0 means none.
    pub class_tag: u8,
    pub timestamp: DateTime<Utc>,
}

/// Event emitted when a player enters the waiting pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerQueued {
    pub player_id: PlayerId,
    pub role: Role,
    pub rating: u32,
    pub queue_depth: usize,
    pub timestamp: DateTime<Utc>,
}

/// Event emitted when a player leaves the waiting pool without a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerLeftQueue {
    pub player_id: PlayerId,
    pub reason: LeaveReason,
    pub timestamp: DateTime<Utc>,
}

/// Event emitted when a balanced match has been formed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchFound {
    pub match_id: MatchId,
    pub team1: Vec<Candidate>,
    pub team2: Vec<Candidate>,
    pub rating_diff: u64,
    /// True when the match was formed through a no-healer fallback path.
    pub all_dps_match: bool,
    pub timestamp: DateTime<Utc>,
}

/// Union type for all AMQP messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AmqpMessage {
    QueueRequest(QueueRequest),
    PlayerQueued(PlayerQueued),
    PlayerLeftQueue(PlayerLeftQueue),
    MatchFound(MatchFound),
}

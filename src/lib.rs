//! Arena Queue - Matchmaking microservice for 3v3 solo-queue arena
//!
//! This crate provides AMQP-based matchmaking for solo-queued arena
//! players: role-aware candidate selection with fallback timers and an
//! exhaustive rating-balanced team partitioner.

pub mod amqp;
pub mod config;
pub mod error;
pub mod matchmaking;
pub mod metrics;
pub mod queue;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{MatchmakingError, NoMatchReason, Result};
pub use types::*;

// Re-export key components
pub use amqp::publisher::EventPublisher;
pub use queue::manager::QueueManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Waiting-pool management around the matchmaking core

pub mod classify;
pub mod manager;
pub mod social;
pub mod statistics;

pub use classify::{DeclaredRoleClassifier, RoleClassifier};
pub use manager::{QueueManager, QueueManagerStats};
pub use social::{InMemoryIgnoreList, SocialConflicts};

//! Social-conflict lookup used as the partition tie-breaker
//!
//! The social graph itself lives outside this service; the partitioner only
//! asks whether two players should avoid sharing a team. Conflicts are
//! symmetric: an ignore in either direction counts.

use crate::types::PlayerId;
use std::collections::HashSet;

/// Check whether two players are mutually incompatible teammates.
#[cfg_attr(test, mockall::automock)]
pub trait SocialConflicts: Send + Sync {
    fn is_conflict(&self, a: &PlayerId, b: &PlayerId) -> bool;
}

/// In-memory ignore list for tests and single-node deployments.
#[derive(Debug, Default)]
pub struct InMemoryIgnoreList {
    // Stored directed; lookup checks both directions.
    ignores: HashSet<(PlayerId, PlayerId)>,
}

impl InMemoryIgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `who` ignores `target`.
    pub fn add_ignore(&mut self, who: &str, target: &str) {
        self.ignores.insert((who.to_string(), target.to_string()));
    }

    pub fn remove_ignore(&mut self, who: &str, target: &str) {
        self.ignores.remove(&(who.to_string(), target.to_string()));
    }

    pub fn len(&self) -> usize {
        self.ignores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ignores.is_empty()
    }
}

impl SocialConflicts for InMemoryIgnoreList {
    fn is_conflict(&self, a: &PlayerId, b: &PlayerId) -> bool {
        self.ignores.contains(&(a.clone(), b.clone())) || self.ignores.contains(&(b.clone(), a.clone()))
    }
}

//! Shared test fixtures and helpers for integration tests

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use arena_queue::amqp::publisher::EventPublisher;
use arena_queue::error::Result;
use arena_queue::types::{
    Candidate, MatchFound, PlayerLeftQueue, PlayerQueued, QueueRequest, Role,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// Build a candidate with a fixed join time
pub fn candidate(id: &str, role: Role, rating: u32) -> Candidate {
    candidate_at(id, role, rating, 0)
}

/// Build a candidate with an explicit join time
pub fn candidate_at(id: &str, role: Role, rating: u32, joined_at_ms: u64) -> Candidate {
    Candidate {
        id: id.to_string(),
        role,
        rating,
        joined_at_ms,
        class_tag: 0,
    }
}

/// Build a candidate with a class tag for stacking tests
pub fn candidate_with_class(id: &str, role: Role, rating: u32, class_tag: u8) -> Candidate {
    Candidate {
        id: id.to_string(),
        role,
        rating,
        joined_at_ms: 0,
        class_tag,
    }
}

/// Build a queue request for manager-level tests
pub fn queue_request(id: &str, role: Role, rating: u32) -> QueueRequest {
    queue_request_with_class(id, role, rating, 0)
}

pub fn queue_request_with_class(id: &str, role: Role, rating: u32, class_tag: u8) -> QueueRequest {
    QueueRequest {
        player_id: id.to_string(),
        role,
        rating,
        class_tag,
        timestamp: chrono::Utc::now(),
    }
}

/// Event publisher that records full event payloads for assertions
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    pub queued: Mutex<Vec<PlayerQueued>>,
    pub left: Mutex<Vec<PlayerLeftQueue>>,
    pub matches: Mutex<Vec<MatchFound>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queued_players(&self) -> Vec<String> {
        self.queued
            .lock()
            .map(|events| events.iter().map(|e| e.player_id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn match_events(&self) -> Vec<MatchFound> {
        self.matches
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish_player_queued(&self, event: PlayerQueued) -> Result<()> {
        if let Ok(mut events) = self.queued.lock() {
            events.push(event);
        }
        Ok(())
    }

    async fn publish_player_left(&self, event: PlayerLeftQueue) -> Result<()> {
        if let Ok(mut events) = self.left.lock() {
            events.push(event);
        }
        Ok(())
    }

    async fn publish_match_found(&self, event: MatchFound) -> Result<()> {
        if let Ok(mut events) = self.matches.lock() {
            events.push(event);
        }
        Ok(())
    }
}

//! AMQP message definitions and serialization

use crate::error::{MatchmakingError, Result};
use crate::types::*;
use serde_json;

/// AMQP queue names
pub const QUEUE_REQUEST_QUEUE: &str = "matchmaking.queue_requests";
pub const PLAYER_EVENTS_EXCHANGE: &str = "matchmaking.player_events";
pub const MATCH_EVENTS_EXCHANGE: &str = "matchmaking.match_events";

/// Routing keys for events
pub const PLAYER_QUEUED_ROUTING_KEY: &str = "player.queued";
pub const PLAYER_LEFT_ROUTING_KEY: &str = "player.left";
pub const MATCH_FOUND_ROUTING_KEY: &str = "match.found";

/// Highest class tag understood by the stacking filter
const MAX_CLASS_TAG: u8 = 11;

/// Message envelope with metadata
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MessageEnvelope<T> {
    pub payload: T,
    pub correlation_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub routing_key: String,
}

impl<T> MessageEnvelope<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    /// Create a new message envelope
    pub fn new(payload: T, routing_key: String) -> Self {
        Self {
            payload,
            correlation_id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now(),
            routing_key,
        }
    }

    /// Serialize the envelope to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            MatchmakingError::InternalError {
                message: format!("Failed to serialize message: {}", e),
            }
            .into()
        })
    }

    /// Deserialize envelope from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| {
            MatchmakingError::InvalidQueueRequest {
                reason: format!("Failed to deserialize message: {}", e),
            }
            .into()
        })
    }
}

/// Message serialization and validation utilities
pub struct MessageUtils;

impl MessageUtils {
    /// Serialize a queue request to bytes
    pub fn serialize_queue_request(request: &QueueRequest) -> Result<Vec<u8>> {
        Self::validate_queue_request(request)?;
        serde_json::to_vec(request).map_err(|e| {
            MatchmakingError::InternalError {
                message: format!("Failed to serialize queue request: {}", e),
            }
            .into()
        })
    }

    /// Deserialize queue request from bytes
    pub fn deserialize_queue_request(bytes: &[u8]) -> Result<QueueRequest> {
        let request: QueueRequest =
            serde_json::from_slice(bytes).map_err(|e| MatchmakingError::InvalidQueueRequest {
                reason: format!("Failed to deserialize queue request: {}", e),
            })?;

        Self::validate_queue_request(&request)?;
        Ok(request)
    }

    /// Validate a queue request
    pub fn validate_queue_request(request: &QueueRequest) -> Result<()> {
        if request.player_id.is_empty() {
            return Err(MatchmakingError::InvalidQueueRequest {
                reason: "Player ID cannot be empty".to_string(),
            }
            .into());
        }

        if request.class_tag > MAX_CLASS_TAG {
            return Err(MatchmakingError::InvalidQueueRequest {
                reason: format!("Unknown class tag: {}", request.class_tag),
            }
            .into());
        }

        Ok(())
    }

    /// Serialize any AMQP message to bytes
    pub fn serialize_message<T: serde::Serialize>(message: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(message).map_err(|e| {
            MatchmakingError::InternalError {
                message: format!("Failed to serialize message: {}", e),
            }
            .into()
        })
    }

    /// Get routing key for a message type
    pub fn get_routing_key(message: &AmqpMessage) -> &'static str {
        match message {
            AmqpMessage::QueueRequest(_) => "queue.request",
            AmqpMessage::PlayerQueued(_) => PLAYER_QUEUED_ROUTING_KEY,
            AmqpMessage::PlayerLeftQueue(_) => PLAYER_LEFT_ROUTING_KEY,
            AmqpMessage::MatchFound(_) => MATCH_FOUND_ROUTING_KEY,
        }
    }
}

//! AMQP message handlers for processing queue requests and events
//!
//! This module provides the message handling infrastructure for the
//! matchmaking service, including request processing and error handling.

use crate::amqp::messages::MessageUtils;
use crate::error::{MatchmakingError, Result};
use crate::types::{AmqpMessage, LeaveReason, PlayerId, QueueRequest};
use amqprs::{
    channel::{BasicCancelArguments, BasicConsumeArguments, Channel},
    consumer::AsyncConsumer,
    BasicProperties, Deliver,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// Trait defining the interface for handling AMQP messages
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle a queue request from a player
    async fn handle_queue_request(&self, request: QueueRequest) -> Result<()>;

    /// Handle a player leaving the queue before being matched
    async fn handle_leave_request(&self, player_id: PlayerId, reason: LeaveReason) -> Result<()>;

    /// Handle processing errors
    async fn handle_error(&self, error: MatchmakingError, message_data: &[u8]);
}

/// Consumer for handling queue request messages
pub struct QueueRequestConsumer {
    handler: Arc<dyn MessageHandler>,
    channel: Channel,
    consumer_tag: String,
}

impl QueueRequestConsumer {
    /// Create a new queue request consumer
    pub fn new(handler: Arc<dyn MessageHandler>, channel: Channel) -> Self {
        let consumer_tag = format!("queue-consumer-{}", uuid::Uuid::new_v4());

        Self {
            handler,
            channel,
            consumer_tag,
        }
    }

    /// Start consuming messages from the queue
    pub async fn start_consuming(&self, queue_name: &str) -> Result<()> {
        let args = BasicConsumeArguments::new(queue_name, &self.consumer_tag);

        self.channel
            .basic_consume(QueueConsumer::new(self.handler.clone()), args)
            .await
            .map_err(|e| MatchmakingError::AmqpConnectionFailed {
                message: format!("Failed to start consuming: {}", e),
            })?;

        info!("Started consuming messages from queue: {}", queue_name);
        Ok(())
    }

    /// Stop consuming messages
    pub async fn stop_consuming(&self) -> Result<()> {
        let args = BasicCancelArguments::new(&self.consumer_tag);

        self.channel.basic_cancel(args).await.map_err(|e| {
            MatchmakingError::AmqpConnectionFailed {
                message: format!("Failed to stop consuming: {}", e),
            }
        })?;

        info!("Stopped consuming messages");
        Ok(())
    }
}

/// Internal consumer implementation
struct QueueConsumer {
    handler: Arc<dyn MessageHandler>,
}

impl QueueConsumer {
    fn new(handler: Arc<dyn MessageHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl AsyncConsumer for QueueConsumer {
    async fn consume(
        &mut self,
        _channel: &Channel,
        deliver: Deliver,
        _basic_properties: BasicProperties,
        _content: Vec<u8>,
    ) {
        let delivery_tag = deliver.delivery_tag();
        let routing_key = deliver.routing_key();

        info!(
            "AMQP message received - delivery_tag: {}, routing_key: '{}', size: {} bytes",
            delivery_tag,
            routing_key,
            _content.len()
        );

        let start_time = std::time::Instant::now();

        match self.process_message(&_content).await {
            Ok(_) => {
                info!(
                    "Message processed successfully - delivery_tag: {}, processing_time: {:.2}ms",
                    delivery_tag,
                    start_time.elapsed().as_secs_f64() * 1000.0
                );
            }
            Err(e) => {
                error!(
                    "Message processing failed - delivery_tag: {}, processing_time: {:.2}ms, error: {}",
                    delivery_tag, start_time.elapsed().as_secs_f64() * 1000.0, e
                );
                self.handler
                    .handle_error(
                        MatchmakingError::InternalError {
                            message: e.to_string(),
                        },
                        &_content,
                    )
                    .await;
            }
        }
    }
}

impl QueueConsumer {
    /// Process an incoming message
    async fn process_message(&self, content: &[u8]) -> Result<()> {
        let message: AmqpMessage =
            serde_json::from_slice(content).map_err(|e| MatchmakingError::InvalidQueueRequest {
                reason: format!("Failed to deserialize message: {}", e),
            })?;

        match message {
            AmqpMessage::QueueRequest(request) => {
                MessageUtils::validate_queue_request(&request)?;

                info!(
                    "Queue request parsed - player_id: '{}', role: {}, rating: {}, class_tag: {}",
                    request.player_id, request.role, request.rating, request.class_tag
                );

                self.handler.handle_queue_request(request).await
            }
            AmqpMessage::PlayerLeftQueue(event) => {
                info!(
                    "Leave request parsed - player_id: '{}', reason: {:?}",
                    event.player_id, event.reason
                );

                self.handler
                    .handle_leave_request(event.player_id, event.reason)
                    .await
            }
            other => Err(MatchmakingError::InvalidQueueRequest {
                reason: format!(
                    "Unexpected message type on request queue: {}",
                    MessageUtils::get_routing_key(&other)
                ),
            }
            .into()),
        }
    }
}

/// Mock message handler for testing
pub struct MockMessageHandler {
    pub received_requests: Arc<tokio::sync::Mutex<Vec<QueueRequest>>>,
    pub received_leaves: Arc<tokio::sync::Mutex<Vec<PlayerId>>>,
}

impl Default for MockMessageHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMessageHandler {
    pub fn new() -> Self {
        Self {
            received_requests: Arc::new(tokio::sync::Mutex::new(Vec::new())),
            received_leaves: Arc::new(tokio::sync::Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl MessageHandler for MockMessageHandler {
    async fn handle_queue_request(&self, request: QueueRequest) -> Result<()> {
        let mut requests = self.received_requests.lock().await;
        requests.push(request);
        Ok(())
    }

    async fn handle_leave_request(&self, player_id: PlayerId, _reason: LeaveReason) -> Result<()> {
        let mut leaves = self.received_leaves.lock().await;
        leaves.push(player_id);
        Ok(())
    }

    async fn handle_error(&self, error: MatchmakingError, _message_data: &[u8]) {
        eprintln!("Mock handler received error: {}", error);
    }
}

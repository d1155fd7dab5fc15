//! AMQP connection management with retry logic

use crate::config::AmqpSettings;
use crate::error::{MatchmakingError, Result};
use amqprs::channel::Channel;
use amqprs::connection::{Connection, OpenConnectionArguments};
use anyhow::Context;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Wrapper around AMQP connection with additional metadata
pub struct AmqpConnection {
    connection: Connection,
    _settings: AmqpSettings,
}

impl AmqpConnection {
    /// Create a new AMQP connection with retry logic
    pub async fn new(settings: AmqpSettings) -> Result<Self> {
        let connection = Self::connect_with_retry(&settings).await?;

        Ok(Self {
            connection,
            _settings: settings,
        })
    }

    /// Attempt to connect with exponential backoff retry
    async fn connect_with_retry(settings: &AmqpSettings) -> Result<Connection> {
        let mut retry_count = 0;
        let mut delay = Duration::from_millis(settings.retry_delay_ms);

        loop {
            match Self::try_connect(settings).await {
                Ok(connection) => {
                    info!("Successfully connected to AMQP broker");
                    return Ok(connection);
                }
                Err(e) => {
                    retry_count += 1;
                    if retry_count > settings.max_retry_attempts {
                        error!(
                            "Failed to connect to AMQP after {} retries",
                            settings.max_retry_attempts
                        );
                        return Err(MatchmakingError::AmqpConnectionFailed {
                            message: format!("Max retries exceeded: {}", e),
                        }
                        .into());
                    }

                    warn!(
                        "AMQP connection attempt {} failed: {}. Retrying in {:?}",
                        retry_count, e, delay
                    );

                    sleep(delay).await;
                    // Exponential backoff, capped
                    delay = Duration::from_millis((delay.as_millis() as u64 * 2).min(30000));
                }
            }
        }
    }

    /// Single connection attempt
    async fn try_connect(settings: &AmqpSettings) -> Result<Connection> {
        let args = OpenConnectionArguments::try_from(settings.url.as_str()).map_err(|e| {
            MatchmakingError::AmqpConnectionFailed {
                message: format!("Invalid AMQP URL: {}", e),
            }
        })?;

        Connection::open(&args)
            .await
            .context("Failed to open AMQP connection")
            .map_err(|e| {
                MatchmakingError::AmqpConnectionFailed {
                    message: e.to_string(),
                }
                .into()
            })
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Open a channel on this connection
    pub async fn open_channel(&self) -> Result<Channel> {
        self.connection
            .open_channel(None)
            .await
            .map_err(|e| {
                MatchmakingError::AmqpConnectionFailed {
                    message: format!("Failed to open channel: {}", e),
                }
                .into()
            })
    }

    /// Check if connection is still alive
    pub fn is_alive(&self) -> bool {
        self.connection.is_open()
    }

    /// Close the connection
    pub async fn close(self) -> Result<()> {
        self.connection
            .close()
            .await
            .context("Failed to close AMQP connection")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_rejected_without_broker() {
        let args = OpenConnectionArguments::try_from("not-a-url");
        assert!(args.is_err());
    }

    #[test]
    fn test_default_settings_parse() {
        let settings = AmqpSettings::default();
        assert!(OpenConnectionArguments::try_from(settings.url.as_str()).is_ok());
    }

    // Note: Integration tests with actual AMQP broker would go in tests/ directory
}

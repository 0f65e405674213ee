//! AMQP publisher used by the outbox dispatcher.
//!
//! Messages go to a durable direct exchange with a fixed routing key per
//! event family. The outbox row id doubles as the AMQP message id so
//! downstream consumers can deduplicate redeliveries.

use async_trait::async_trait;
use hive_core::types::Id;
use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};

/// Name of the durable direct exchange for notification events.
pub const NOTIFICATIONS_EXCHANGE: &str = "hive.notifications";

/// Error type for broker publish failures.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Connection, channel, or publish failure from the AMQP client.
    #[error("AMQP error: {0}")]
    Amqp(#[from] lapin::Error),

    /// Failure injected by a scripted test publisher.
    #[error("publish failed: {0}")]
    Other(String),
}

/// Publish sink the dispatcher writes to. Behind a trait so tests can
/// substitute a scripted in-memory publisher.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(
        &self,
        routing_key: &str,
        message_id: Id,
        payload: &[u8],
    ) -> Result<(), PublishError>;
}

/// AMQP connection settings.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub vhost: String,
}

impl BrokerConfig {
    /// Build the AMQP connection URI.
    pub fn amqp_uri(&self) -> String {
        format!(
            "amqp://{}:{}@{}:{}/{}",
            self.username,
            self.password,
            self.host,
            self.port,
            // The default vhost "/" must be percent-encoded in the URI.
            if self.vhost == "/" {
                "%2f".to_string()
            } else {
                self.vhost.clone()
            }
        )
    }
}

/// Publisher backed by a lapin channel on a declared direct exchange.
pub struct AmqpPublisher {
    channel: Channel,
    exchange: String,
}

impl AmqpPublisher {
    /// Connect to the broker and declare the notifications exchange.
    pub async fn connect(config: &BrokerConfig) -> Result<Self, PublishError> {
        let connection =
            Connection::connect(&config.amqp_uri(), ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .exchange_declare(
                NOTIFICATIONS_EXCHANGE,
                ExchangeKind::Direct,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        tracing::info!(
            exchange = NOTIFICATIONS_EXCHANGE,
            host = %config.host,
            port = config.port,
            "Connected to AMQP broker"
        );
        Ok(Self {
            channel,
            exchange: NOTIFICATIONS_EXCHANGE.to_string(),
        })
    }
}

#[async_trait]
impl EventPublisher for AmqpPublisher {
    async fn publish(
        &self,
        routing_key: &str,
        message_id: Id,
        payload: &[u8],
    ) -> Result<(), PublishError> {
        let properties = BasicProperties::default()
            .with_content_type("application/json".into())
            .with_message_id(message_id.to_string().into())
            // Persistent delivery: the broker writes the message to disk.
            .with_delivery_mode(2);
        self.channel
            .basic_publish(
                &self.exchange,
                routing_key,
                BasicPublishOptions::default(),
                payload,
                properties,
            )
            .await?
            .await?;
        Ok(())
    }
}

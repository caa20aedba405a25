//! AMQP Job Publisher
//!
//! Publishes job descriptors to the durable submission queue.

use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::uri::{AMQPAuthority, AMQPUri, AMQPUserInfo};
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tokio::sync::Mutex;

use crate::application::config::AmqpConfig;
use crate::domain::repository::JobPublisher;
use crate::domain::value_objects::JobDescriptor;
use crate::error::DispatchError;

/// Persistent delivery
const DELIVERY_MODE_PERSISTENT: u8 = 2;

impl From<lapin::Error> for DispatchError {
    fn from(err: lapin::Error) -> Self {
        DispatchError::with_source("broker error", err)
    }
}

/// Broker connection shared by every handler
///
/// Publishes are serialized on one channel. There is no reconnect: once the
/// broker is lost every publish fails until the process restarts.
pub struct AmqpPublisher {
    connection: Connection,
    channel: Mutex<Channel>,
    queue: String,
}

impl AmqpPublisher {
    /// Connect, open a channel and declare the durable queue
    ///
    /// The initial connect is retried `connect_attempts` times.
    pub async fn connect(config: &AmqpConfig) -> Result<Self, DispatchError> {
        let connection = Self::connect_with_retry(config).await?;

        let channel = connection.create_channel().await?;
        channel
            .queue_declare(
                &config.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        tracing::info!(host = %config.host, queue = %config.queue, "Connected to broker");

        Ok(Self {
            connection,
            channel: Mutex::new(channel),
            queue: config.queue.clone(),
        })
    }

    async fn connect_with_retry(config: &AmqpConfig) -> Result<Connection, DispatchError> {
        let uri = AMQPUri {
            authority: AMQPAuthority {
                userinfo: AMQPUserInfo {
                    username: config.user.clone(),
                    password: config.password.clone(),
                },
                host: config.host.clone(),
                port: config.port,
            },
            ..Default::default()
        };

        let mut attempt = 1;
        loop {
            match Connection::connect_uri(uri.clone(), ConnectionProperties::default()).await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempt < config.connect_attempts => {
                    tracing::warn!(
                        attempt = attempt,
                        max_attempts = config.connect_attempts,
                        error = %e,
                        "Broker not reachable, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(config.connect_backoff).await;
                }
                Err(e) => {
                    return Err(DispatchError::with_source(
                        format!("broker unreachable after {attempt} attempts"),
                        e,
                    ));
                }
            }
        }
    }

    /// Close channel and connection
    pub async fn close(&self) -> Result<(), DispatchError> {
        self.channel.lock().await.close(200, "shutdown").await?;
        self.connection.close(200, "shutdown").await?;
        Ok(())
    }
}

impl JobPublisher for AmqpPublisher {
    async fn publish(&self, job: &JobDescriptor) -> Result<(), DispatchError> {
        let payload = serde_json::to_vec(job)
            .map_err(|e| DispatchError::with_source("job serialization failed", e))?;

        let properties = BasicProperties::default()
            .with_content_type("text/plain".into())
            .with_delivery_mode(DELIVERY_MODE_PERSISTENT);

        let channel = self.channel.lock().await;
        channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                &payload,
                properties,
            )
            .await?
            .await?;

        Ok(())
    }
}

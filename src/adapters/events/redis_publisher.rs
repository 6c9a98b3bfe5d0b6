//! Redis pub/sub event publisher for production deployments.
//!
//! Each envelope is serialized to JSON and `PUBLISH`ed on a channel named
//! after its event type (`payment.succeed`). Publishing is fire-and-forget:
//! the command runs on a spawned task and `publish` returns as soon as the
//! envelope is serialized. Delivery is therefore at-most-once.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// Bound on establishing a connection to one broker address.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis-backed event publisher.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: MultiplexedConnection,
}

impl RedisEventPublisher {
    /// Wrap an established connection.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Connect to the first reachable broker in `servers`, trying them in order.
    ///
    /// # Errors
    ///
    /// Returns a `MessageBrokerError` naming every address that failed when
    /// none could be reached.
    pub async fn connect(servers: &[String]) -> Result<Self, DomainError> {
        let mut failures = Vec::new();

        for server in servers {
            match Self::connect_one(server).await {
                Ok(conn) => {
                    tracing::info!(server = %server, "Connected to message broker");
                    return Ok(Self::new(conn));
                }
                Err(e) => {
                    tracing::warn!(server = %server, error = %e, "Message broker unreachable");
                    failures.push(format!("{}: {}", server, e));
                }
            }
        }

        Err(DomainError::broker(format!(
            "no message broker reachable ({})",
            if failures.is_empty() {
                "no servers configured".to_string()
            } else {
                failures.join("; ")
            }
        )))
    }

    async fn connect_one(server: &str) -> Result<MultiplexedConnection, String> {
        let client = redis::Client::open(server).map_err(|e| e.to_string())?;
        match tokio::time::timeout(CONNECT_TIMEOUT, client.get_multiplexed_tokio_connection())
            .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {:?}", CONNECT_TIMEOUT)),
        }
    }

    /// Channel an envelope is published on.
    pub fn channel_for(event: &EventEnvelope) -> &str {
        &event.event_type
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let channel = Self::channel_for(&event).to_string();
        let payload = serde_json::to_string(&event).map_err(|e| {
            DomainError::new(ErrorCode::SerializationError, e.to_string())
                .with_detail("event_type", channel.clone())
        })?;

        let mut conn = self.conn.clone();
        let event_id = event.event_id;
        tokio::spawn(async move {
            match conn.publish::<_, _, i64>(&channel, payload).await {
                Ok(receivers) => {
                    tracing::debug!(
                        channel = %channel,
                        event_id = %event_id,
                        receivers,
                        "Published event"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        channel = %channel,
                        event_id = %event_id,
                        error = %e,
                        "Failed to publish event"
                    );
                }
            }
        });

        Ok(())
    }
}

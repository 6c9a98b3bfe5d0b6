//! EventPublisher port - Interface for publishing domain events.
//!
//! This port defines how the domain publishes events without knowing
//! about the underlying transport mechanism (in-memory, Redis, etc.).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Delivery is at-most-once: adapters may hand the message off in the
/// background and return before the broker has accepted it.
///
/// # Example
///
/// ```ignore
/// let envelope = EventEnvelope::from_event(&payment_succeeded)?;
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event, routed by `event.event_type`.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;
}

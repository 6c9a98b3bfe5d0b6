//! Webhook verification errors.
//!
//! Every variant here means the request was not authenticated as coming from
//! the payment processor. They all surface as HTTP 400 so the processor does
//! not retry a delivery we will never accept.

use thiserror::Error;

/// Errors that reject an incoming webhook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// No signature header was sent.
    #[error("No stripe-signature header value was provided")]
    MissingSignature,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is older than the tolerance window.
    #[error("Timestamp outside the tolerance zone")]
    TimestampOutOfRange,

    /// Failed to parse the signature header.
    #[error("Unable to extract timestamp and signatures from header: {0}")]
    MalformedHeader(String),

    /// Signature matched but the body is not JSON.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

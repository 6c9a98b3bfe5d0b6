//! HandlePaymentWebhookHandler - Command handler for processing payment processor webhooks.
//!
//! Flow: verify the signature over the raw body, classify the event, and for
//! `charge.succeeded` hand a `payment.succeed` envelope to the message sink.
//! Once verification passes the webhook is always acknowledged; sink failures
//! are logged and swallowed.

use std::sync::Arc;

use crate::domain::foundation::EventEnvelope;
use crate::domain::payment::{
    translate, PaymentSucceeded, StripeWebhookVerifier, WebhookError, WebhookTranslation,
};
use crate::ports::EventPublisher;

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload, exactly as received.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header, if one was sent.
    pub signature: Option<String>,
}

/// Result of webhook processing. Every variant is acknowledged with 200.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlePaymentWebhookResult {
    /// A `payment.succeed` event was handed to the sink.
    PaymentSucceededEmitted { order_id: String },
    /// Translated, but the sink refused the message.
    EmitFailed { order_id: String },
    /// Event acknowledged without emission.
    Ignored { reason: String },
}

/// Handler for processing payment processor webhooks.
pub struct HandlePaymentWebhookHandler {
    verifier: StripeWebhookVerifier,
    event_publisher: Arc<dyn EventPublisher>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(verifier: StripeWebhookVerifier, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            verifier,
            event_publisher,
        }
    }

    /// Verifies and processes one delivery.
    ///
    /// # Errors
    ///
    /// Only verification failures are returned; the caller rejects those with
    /// HTTP 400.
    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        // 1. Verify webhook signature and parse event
        let signature = cmd.signature.ok_or(WebhookError::MissingSignature)?;
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, &signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook verification failed");
                e
            })?;

        tracing::debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            livemode = event.livemode,
            "Webhook verified"
        );

        // 2. Classify
        match translate(&event) {
            WebhookTranslation::PaymentSucceeded(payment) => Ok(self.emit(payment).await),
            WebhookTranslation::Ignored { reason } => {
                tracing::warn!(event_id = %event.id, "{}", reason);
                Ok(HandlePaymentWebhookResult::Ignored { reason })
            }
        }
    }

    async fn emit(&self, payment: PaymentSucceeded) -> HandlePaymentWebhookResult {
        let order_id = payment.order_id.clone();

        let envelope = match EventEnvelope::from_event(&payment) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(order_id = %order_id, error = %e, "Failed to build event envelope");
                return HandlePaymentWebhookResult::EmitFailed { order_id };
            }
        };

        match self.event_publisher.publish(envelope).await {
            Ok(()) => {
                tracing::info!(
                    order_id = %order_id,
                    stripe_payment_id = %payment.stripe_payment_id,
                    "Emitted {}",
                    PaymentSucceeded::EVENT_TYPE
                );
                HandlePaymentWebhookResult::PaymentSucceededEmitted { order_id }
            }
            Err(e) => {
                tracing::warn!(order_id = %order_id, error = %e, "Failed to publish payment event");
                HandlePaymentWebhookResult::EmitFailed { order_id }
            }
        }
    }
}

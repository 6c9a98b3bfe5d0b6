//! Classification of verified processor events.
//!
//! Pure mapping from a verified `StripeEvent` to what the service should do
//! with it. Nothing here fails: anything we cannot act on is `Ignored` with a
//! reason the caller logs.

use super::events::PaymentSucceeded;
use super::stripe_event::{ChargeObject, StripeEvent, StripeEventType};

/// Outcome of classifying a verified event.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookTranslation {
    /// Emit this event to the message sink.
    PaymentSucceeded(PaymentSucceeded),
    /// Acknowledge without emitting.
    Ignored { reason: String },
}

impl WebhookTranslation {
    fn ignored(reason: impl Into<String>) -> Self {
        Self::Ignored {
            reason: reason.into(),
        }
    }
}

/// Classifies a verified event.
///
/// Only `charge.succeeded` carrying both a charge id and an `orderId` in its
/// metadata is translated.
pub fn translate(event: &StripeEvent) -> WebhookTranslation {
    match event.parsed_type() {
        StripeEventType::ChargeSucceeded => translate_charge_succeeded(event),
        StripeEventType::Unhandled => {
            WebhookTranslation::ignored(format!("Unhandled event type {}", event.event_type))
        }
    }
}

fn translate_charge_succeeded(event: &StripeEvent) -> WebhookTranslation {
    let charge: ChargeObject = match event.deserialize_object() {
        Ok(charge) => charge,
        Err(e) => {
            return WebhookTranslation::ignored(format!("undecodable charge object: {}", e));
        }
    };

    let Some(payment_id) = charge.id.as_deref().filter(|id| !id.is_empty()) else {
        return WebhookTranslation::ignored("charge has no id");
    };
    let Some(order_id) = charge.order_id() else {
        return WebhookTranslation::ignored(format!(
            "charge {} has no {} metadata",
            payment_id,
            ChargeObject::ORDER_ID_KEY
        ));
    };

    WebhookTranslation::PaymentSucceeded(PaymentSucceeded::new(
        payment_id,
        order_id,
        charge.receipt_url.clone(),
    ))
}

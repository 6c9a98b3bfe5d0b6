//! Payment domain events.
//!
//! Events are named in past tense and published to the message sink with
//! their `event_type` as the routing key.

use serde::Serialize;

use crate::domain::foundation::{EventId, Timestamp};

/// A charge was captured by the payment processor for an internal order.
///
/// Serialized (camelCase) as the payload of the `payment.succeed` message:
/// `{ "stripePaymentId": "...", "orderId": "...", "receiptUrl": "..." | null }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceeded {
    #[serde(skip)]
    pub event_id: EventId,

    /// Processor-side identifier of the charge.
    pub stripe_payment_id: String,

    /// Internal order identifier recovered from the charge metadata.
    pub order_id: String,

    /// Hosted receipt page, when the processor issued one.
    pub receipt_url: Option<String>,

    #[serde(skip)]
    pub succeeded_at: Timestamp,
}

crate::domain_event!(
    PaymentSucceeded,
    event_type = "payment.succeed",
    aggregate_id = order_id,
    aggregate_type = "Order",
    occurred_at = succeeded_at,
    event_id = event_id
);

impl PaymentSucceeded {
    /// Routing key on the message sink.
    pub const EVENT_TYPE: &'static str = "payment.succeed";

    pub fn new(
        stripe_payment_id: impl Into<String>,
        order_id: impl Into<String>,
        receipt_url: Option<String>,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            stripe_payment_id: stripe_payment_id.into(),
            order_id: order_id.into(),
            receipt_url,
            succeeded_at: Timestamp::now(),
        }
    }
}

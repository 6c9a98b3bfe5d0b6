//! Stripe webhook event types.
//!
//! Defines the structures for decoding Stripe webhook payloads.
//! Only fields relevant to our processing are captured, and every field of the
//! inner object is optional so that a partially populated event degrades to
//! "ignored" instead of failing the request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Stripe webhook event envelope.
///
/// Every field defaults, so any JSON object decodes; a body missing `type`
/// classifies as unhandled.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    #[serde(default)]
    pub id: String,

    /// Type of event (e.g., "charge.succeeded").
    #[serde(rename = "type", default)]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    /// Object containing event-specific data.
    #[serde(default)]
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    #[serde(default)]
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Decodes an already parsed JSON body.
    ///
    /// Valid JSON that does not have the envelope's shape (an array, a `type`
    /// that is not a string) yields an empty, unhandled event.
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Webhook body is not an event envelope");
            Self::default()
        })
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }
}

/// Stripe event types that we act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// A charge was captured successfully.
    ChargeSucceeded,
    /// Anything else; logged and acknowledged.
    Unhandled,
}

impl StripeEventType {
    /// Parse event type from string.
    pub fn parse(s: &str) -> Self {
        match s {
            "charge.succeeded" => Self::ChargeSucceeded,
            _ => Self::Unhandled,
        }
    }
}

/// Stripe Charge object, as carried by `charge.*` events.
///
/// The order id rides on the payment intent metadata set at checkout time and
/// is copied by Stripe onto the charge.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChargeObject {
    /// Charge or payment identifier.
    #[serde(default)]
    pub id: Option<String>,

    /// Free-form metadata attached at checkout.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Hosted receipt page.
    #[serde(default)]
    pub receipt_url: Option<String>,
}

impl ChargeObject {
    /// Metadata key under which the checkout stores the internal order id.
    pub const ORDER_ID_KEY: &'static str = "orderId";

    /// Returns the internal order id, if the charge carries one.
    pub fn order_id(&self) -> Option<&str> {
        self.metadata
            .get(Self::ORDER_ID_KEY)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "charge.succeeded".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_type(mut self, event_type: &str) -> Self {
        self.event_type = event_type.to_string();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
            },
            livemode: self.livemode,
            api_version: Some("2024-06-20".to_string()),
        }
    }
}

//! Payment domain - checkout requests and processor webhooks.
//!
//! - `checkout` - order checkout requests and their processor price descriptors
//! - `stripe_event` - decoded webhook events
//! - `webhook_verifier` - signature and replay checks over the raw body
//! - `translation` - classification of verified events
//! - `events` - events published to the message sink

mod checkout;
mod events;
mod stripe_event;
mod translation;
mod webhook_errors;
mod webhook_verifier;

pub use checkout::{to_minor_units, CheckoutItem, CheckoutRequest, LineItemPrice};
pub use events::PaymentSucceeded;
pub use stripe_event::{ChargeObject, StripeEvent, StripeEventData, StripeEventType};
pub use translation::{translate, WebhookTranslation};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, SignatureHeader, StripeWebhookVerifier};

//! Payment handlers.
//!
//! ## Commands
//! - Opening a hosted checkout session for an order
//! - Processing payment processor webhooks

mod create_payment_session;
mod handle_payment_webhook;

pub use create_payment_session::{
    CreatePaymentSessionCommand, CreatePaymentSessionError, CreatePaymentSessionHandler,
    CreatePaymentSessionResult,
};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};

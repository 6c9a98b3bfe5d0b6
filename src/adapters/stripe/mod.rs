//! Stripe payment processor adapter.
//!
//! Implements the `PaymentProcessor` port for Stripe hosted checkout.
//! Webhook verification lives in the domain (`domain::payment`) since it
//! needs no I/O.
//!
//! # Configuration
//!
//! - `PAYMENTS__PAYMENT__STRIPE_SECRET_KEY`: Stripe secret API key
//! - `PAYMENTS__PAYMENT__API_BASE_URL`: override for tests and proxies

mod api_types;
mod mock_payment_processor;
mod stripe_adapter;

pub use api_types::{StripeApiError, StripeCheckoutSession, StripeErrorResponse};
pub use mock_payment_processor::MockPaymentProcessor;
pub use stripe_adapter::{
    checkout_form_params, StripeConfig, StripePaymentAdapter, DEFAULT_API_BASE_URL,
};

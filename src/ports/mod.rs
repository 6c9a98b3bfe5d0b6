//! Ports - interfaces the application layer depends on.
//!
//! Adapters under `crate::adapters` implement these traits.

mod event_publisher;
mod payment_processor;

pub use event_publisher::EventPublisher;
pub use payment_processor::{
    CheckoutMode, CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentErrorCode,
    PaymentProcessor,
};

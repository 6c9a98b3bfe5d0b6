//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Event publisher implementations (in-memory, Redis)
//! - `stripe` - Payment processor implementations (Stripe, mock)
//! - `http` - Axum routes exposing the application layer

pub mod events;
pub mod http;
pub mod stripe;

pub use events::{InMemoryEventBus, RedisEventPublisher};
pub use stripe::{MockPaymentProcessor, StripeConfig, StripePaymentAdapter};

//! HTTP adapter for payment endpoints.
//!
//! Exposes the payment application layer via REST API:
//! - `POST /payments/session` - Open a hosted checkout session
//! - `POST /webhook` - Handle Stripe webhooks
//! - `GET /success` / `GET /cancel` - Redirect landing pages
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{PaymentsAppState, PaymentsApiError, WebhookRejection, STRIPE_SIGNATURE_HEADER};
pub use routes::payments_router;

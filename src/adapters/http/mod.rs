//! HTTP adapters - REST API implementations.
//!
//! `build_router` wires the payment routes to their state and wraps them in the
//! request-id, tracing and timeout middleware.

pub mod payments;

use std::time::Duration;

use axum::Router;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use payments::{payments_router, PaymentsAppState};

/// Generates a UUID v4 `x-request-id` for requests that arrive without one.
#[derive(Clone, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let request_id = uuid::Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(request_id))
    }
}

/// Builds the service router.
///
/// `request_timeout` bounds whole requests; it should exceed the processor
/// timeout so that a slow processor surfaces as 504 rather than 408.
pub fn build_router(state: PaymentsAppState, request_timeout: Duration) -> Router {
    payments_router()
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::stripe::MockPaymentProcessor;
    use crate::domain::payment::StripeWebhookVerifier;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> PaymentsAppState {
        PaymentsAppState {
            payment_processor: Arc::new(MockPaymentProcessor::new()),
            event_publisher: Arc::new(InMemoryEventBus::new()),
            webhook_verifier: StripeWebhookVerifier::new("whsec_test"),
            success_url: "https://shop.test/success".to_string(),
            cancel_url: "https://shop.test/cancel".to_string(),
        }
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let app = build_router(state(), Duration::from_secs(5));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn incoming_request_id_is_propagated() {
        let app = build_router(state(), Duration::from_secs(5));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = build_router(state(), Duration::from_secs(5));

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

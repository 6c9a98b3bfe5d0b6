//! Route configuration for payment endpoints.
//!
//! Configures Axum router with payment-related routes.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    create_payment_session, handle_webhook, health, payment_cancelled, payment_success,
    PaymentsAppState,
};

/// Creates the payments router with all endpoints.
///
/// Routes:
/// - `POST /payments/session` - Open a hosted checkout session
/// - `POST /webhook` - Stripe webhook receiver (raw body)
/// - `GET /success` - Checkout success landing
/// - `GET /cancel` - Checkout cancel landing
/// - `GET /health` - Liveness probe
pub fn payments_router() -> Router<PaymentsAppState> {
    Router::new()
        .route("/payments/session", post(create_payment_session))
        .route("/webhook", post(handle_webhook))
        .route("/success", get(payment_success))
        .route("/cancel", get(payment_cancelled))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::stripe::MockPaymentProcessor;
    use crate::domain::payment::{sign_payload, StripeWebhookVerifier};
    use crate::ports::PaymentError;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "whsec_routes_test";

    // ───────────────────────────────────────────────────────────────
    // Helpers
    // ───────────────────────────────────────────────────────────────

    fn app(processor: MockPaymentProcessor, bus: Arc<InMemoryEventBus>) -> Router {
        let state = PaymentsAppState {
            payment_processor: Arc::new(processor),
            event_publisher: bus,
            webhook_verifier: StripeWebhookVerifier::new(SECRET),
            success_url: "https://shop.test/success".to_string(),
            cancel_url: "https://shop.test/cancel".to_string(),
        };
        payments_router().with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn webhook(payload: &[u8], signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/webhook");
        if let Some(signature) = signature {
            builder = builder.header("Stripe-Signature", signature);
        }
        builder.body(Body::from(payload.to_vec())).unwrap()
    }

    fn checkout_body() -> Value {
        json!({
            "currency": "usd",
            "orderId": "ord_9",
            "items": [{"name": "Mouse", "price": 19.999, "quantity": 2}]
        })
    }

    fn charge_event(event_type: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_1",
            "type": event_type,
            "data": {"object": {
                "id": "pi_1",
                "metadata": {"orderId": "ord_9"},
                "receipt_url": "http://r"
            }}
        }))
        .unwrap()
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    // ───────────────────────────────────────────────────────────────
    // Session
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn session_returns_redirect_urls() {
        let bus = Arc::new(InMemoryEventBus::new());
        let app = app(MockPaymentProcessor::new(), bus);

        let response = app
            .oneshot(post_json("/payments/session", &checkout_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["url"].as_str().unwrap().starts_with("https://checkout.stripe.com/"));
        assert_eq!(body["successUrl"], "https://shop.test/success");
        assert_eq!(body["cancelUrl"], "https://shop.test/cancel");
    }

    #[tokio::test]
    async fn session_rejects_invalid_order_with_400() {
        let processor = MockPaymentProcessor::new();
        let app = app(processor.clone(), Arc::new(InMemoryEventBus::new()));
        let mut body = checkout_body();
        body["items"] = json!([]);

        let response = app
            .oneshot(post_json("/payments/session", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_FAILED");
        assert_eq!(processor.call_count(), 0);
    }

    #[tokio::test]
    async fn session_rejects_malformed_json_with_400() {
        let app = app(MockPaymentProcessor::new(), Arc::new(InMemoryEventBus::new()));

        let response = app
            .oneshot(post_json("/payments/session", &json!({"currency": "usd"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn session_rejects_unknown_properties_with_400() {
        let processor = MockPaymentProcessor::new();
        let app = app(processor.clone(), Arc::new(InMemoryEventBus::new()));
        let mut body = checkout_body();
        body["coupon"] = json!("FREE");

        let response = app
            .clone()
            .oneshot(post_json("/payments/session", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

        let mut body = checkout_body();
        body["items"][0]["sku"] = json!("M-1");
        let response = app
            .oneshot(post_json("/payments/session", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(processor.call_count(), 0);
    }

    #[tokio::test]
    async fn session_surfaces_processor_failure_as_502() {
        let processor = MockPaymentProcessor::failing(
            PaymentError::invalid_request("No such price").with_provider_code("resource_missing"),
        );
        let app = app(processor, Arc::new(InMemoryEventBus::new()));

        let response = app
            .oneshot(post_json("/payments/session", &checkout_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["code"], "PROCESSOR_ERROR");
        assert_eq!(body["message"], "No such price");
        assert_eq!(body["details"]["provider_code"], "resource_missing");
    }

    // ───────────────────────────────────────────────────────────────
    // Webhook
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn webhook_acknowledges_and_emits_charge_succeeded() {
        let bus = Arc::new(InMemoryEventBus::new());
        let app = app(MockPaymentProcessor::new(), bus.clone());
        let payload = charge_event("charge.succeeded");
        let signature = sign_payload(SECRET, now(), &payload);

        let response = app.oneshot(webhook(&payload, Some(signature))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"received": true}));
        assert_eq!(bus.events_of_type("payment.succeed").len(), 1);
    }

    #[tokio::test]
    async fn webhook_acknowledges_unhandled_types_without_emission() {
        let bus = Arc::new(InMemoryEventBus::new());
        let app = app(MockPaymentProcessor::new(), bus.clone());
        let payload = charge_event("charge.failed");
        let signature = sign_payload(SECRET, now(), &payload);

        let response = app.oneshot(webhook(&payload, Some(signature))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"received": true}));
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn webhook_json_without_envelope_fields_is_acknowledged() {
        let bus = Arc::new(InMemoryEventBus::new());
        let app = app(MockPaymentProcessor::new(), bus.clone());
        let payload = br#"{"type":"charge.failed"}"#;
        let signature = sign_payload(SECRET, now(), payload);

        let response = app.oneshot(webhook(payload, Some(signature))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"received": true}));
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn webhook_without_data_is_acknowledged() {
        let bus = Arc::new(InMemoryEventBus::new());
        let app = app(MockPaymentProcessor::new(), bus.clone());
        let payload = br#"{"id":"evt_1","type":"customer.created"}"#;
        let signature = sign_payload(SECRET, now(), payload);

        let response = app.oneshot(webhook(payload, Some(signature))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn webhook_with_non_json_body_is_400() {
        let app = app(MockPaymentProcessor::new(), Arc::new(InMemoryEventBus::new()));
        let payload = b"not json";
        let signature = sign_payload(SECRET, now(), payload);

        let response = app.oneshot(webhook(payload, Some(signature))).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.starts_with("Webhook Error: Invalid payload"));
    }

    #[tokio::test]
    async fn webhook_with_wrong_secret_is_400_plain_text() {
        let bus = Arc::new(InMemoryEventBus::new());
        let app = app(MockPaymentProcessor::new(), bus.clone());
        let payload = charge_event("charge.succeeded");
        let signature = sign_payload("whsec_other", now(), &payload);

        let response = app.oneshot(webhook(&payload, Some(signature))).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Webhook Error: Invalid signature");
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn webhook_without_signature_is_400() {
        let app = app(MockPaymentProcessor::new(), Arc::new(InMemoryEventBus::new()));

        let response = app
            .oneshot(webhook(&charge_event("charge.succeeded"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.starts_with("Webhook Error: "));
    }

    // ───────────────────────────────────────────────────────────────
    // Static
    // ───────────────────────────────────────────────────────────────

    async fn get_json(app: &Router, uri: &str) -> Value {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn success_and_cancel_are_static() {
        let app = app(MockPaymentProcessor::new(), Arc::new(InMemoryEventBus::new()));
        let success = json!({"ok": true, "message": "Payment Success"});
        let cancel = json!({"ok": false, "message": "Payments Cancelled"});

        assert_eq!(get_json(&app, "/success").await, success);
        assert_eq!(get_json(&app, "/cancel").await, cancel);

        // Other traffic leaves the pages unchanged.
        let payload = charge_event("charge.succeeded");
        let signature = sign_payload(SECRET, now(), &payload);
        app.clone()
            .oneshot(webhook(&payload, Some(signature)))
            .await
            .unwrap();
        app.clone()
            .oneshot(post_json("/payments/session", &checkout_body()))
            .await
            .unwrap();

        for _ in 0..3 {
            assert_eq!(get_json(&app, "/success").await, success);
            assert_eq!(get_json(&app, "/cancel").await, cancel);
        }
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app(MockPaymentProcessor::new(), Arc::new(InMemoryEventBus::new()));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));
    }
}

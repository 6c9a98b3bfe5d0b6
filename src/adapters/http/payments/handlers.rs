//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::{
    CreatePaymentSessionCommand, CreatePaymentSessionError, CreatePaymentSessionHandler,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
};
use crate::domain::payment::{CheckoutRequest, StripeWebhookVerifier, WebhookError};
use crate::ports::{EventPublisher, PaymentErrorCode, PaymentProcessor};

use super::dto::{
    ErrorResponse, HealthResponse, PaymentSessionResponse, RedirectResponse, WebhookAckResponse,
};

/// Header carrying the webhook signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct PaymentsAppState {
    pub payment_processor: Arc<dyn PaymentProcessor>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub webhook_verifier: StripeWebhookVerifier,
    pub success_url: String,
    pub cancel_url: String,
}

impl PaymentsAppState {
    pub fn create_payment_session_handler(&self) -> CreatePaymentSessionHandler {
        CreatePaymentSessionHandler::new(
            self.payment_processor.clone(),
            self.success_url.clone(),
            self.cancel_url.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.event_publisher.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /payments/session - Open a hosted checkout session
pub async fn create_payment_session(
    State(state): State<PaymentsAppState>,
    request: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let Json(request) = request.map_err(|e| PaymentsApiError::BadRequest(e.body_text()))?;

    let handler = state.create_payment_session_handler();
    let result = handler
        .handle(CreatePaymentSessionCommand { request })
        .await?;

    Ok((StatusCode::OK, Json(PaymentSessionResponse::from(result))))
}

/// POST /webhook - Handle payment processor webhooks
///
/// The body is taken as raw bytes; the signature covers them exactly.
pub async fn handle_webhook(
    State(state): State<PaymentsAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookRejection> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let handler = state.webhook_handler();
    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    handler.handle(cmd).await?;

    Ok((StatusCode::OK, Json(WebhookAckResponse::received())))
}

// ════════════════════════════════════════════════════════════════════════════════
// Static Endpoints (GET)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /success - Landing page after a completed checkout
pub async fn payment_success() -> Json<RedirectResponse> {
    Json(RedirectResponse::success())
}

/// GET /cancel - Landing page after an abandoned checkout
pub async fn payment_cancelled() -> Json<RedirectResponse> {
    Json(RedirectResponse::cancelled())
}

/// GET /health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum PaymentsApiError {
    BadRequest(String),
    Session(CreatePaymentSessionError),
}

impl From<CreatePaymentSessionError> for PaymentsApiError {
    fn from(err: CreatePaymentSessionError) -> Self {
        PaymentsApiError::Session(err)
    }
}

impl IntoResponse for PaymentsApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            PaymentsApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            PaymentsApiError::Session(CreatePaymentSessionError::Validation(err)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::validation(err.to_string())
                    .with_details(serde_json::json!({ "field": err.field() })),
            ),
            PaymentsApiError::Session(CreatePaymentSessionError::Processor(err)) => {
                let status = match err.code {
                    PaymentErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                let details = serde_json::json!({
                    "processor_code": err.code.to_string(),
                    "provider_code": err.provider_code,
                });
                (
                    status,
                    ErrorResponse::new("PROCESSOR_ERROR", err.message).with_details(details),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

/// Rejection for webhooks that fail verification: 400 with a plain-text reason.
#[derive(Debug)]
pub struct WebhookRejection(pub WebhookError);

impl From<WebhookError> for WebhookRejection {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Webhook Error: {}", self.0),
        )
            .into_response()
    }
}

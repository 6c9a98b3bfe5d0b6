//! HTTP DTOs (Data Transfer Objects) for payment endpoints.
//!
//! The checkout request body deserializes straight into
//! `domain::payment::CheckoutRequest`; only responses need their own shapes.

use serde::{Deserialize, Serialize};

use crate::application::CreatePaymentSessionResult;

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a created checkout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionResponse {
    /// Processor-hosted checkout page to redirect the customer to.
    pub url: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl From<CreatePaymentSessionResult> for PaymentSessionResponse {
    fn from(result: CreatePaymentSessionResult) -> Self {
        Self {
            url: result.url,
            success_url: result.success_url,
            cancel_url: result.cancel_url,
        }
    }
}

/// Acknowledgement returned for every verified webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookAckResponse {
    pub received: bool,
}

impl WebhookAckResponse {
    pub fn received() -> Self {
        Self { received: true }
    }
}

/// Body of the static redirect landing pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub ok: bool,
    pub message: String,
}

impl RedirectResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            message: "Payment Success".to_string(),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            ok: false,
            message: "Payments Cancelled".to_string(),
        }
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_FAILED", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}

//! Stripe REST API wire types.
//!
//! Only the fields the adapter reads are captured.

use serde::Deserialize;

/// Checkout Session object returned by `POST /v1/checkout/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSession {
    /// Unique session identifier (cs_...).
    pub id: String,

    /// Hosted checkout page. Absent once the session is complete or expired.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub success_url: Option<String>,

    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// Error body returned on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    /// Error category (api_error, card_error, invalid_request_error, ...).
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    /// Short machine code, e.g. `parameter_missing`.
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

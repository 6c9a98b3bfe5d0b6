//! Stripe payment processor adapter.
//!
//! Implements the `PaymentProcessor` trait against the Stripe REST API.
//!
//! # Security
//!
//! - The secret key is held in `secrecy::SecretString` and only exposed to
//!   build the basic-auth header
//! - Every request carries a bounded timeout
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(secret_key).with_timeout(Duration::from_secs(10));
//! let adapter = StripePaymentAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{
    CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentErrorCode, PaymentProcessor,
};

use super::api_types::{StripeCheckoutSession, StripeErrorResponse};

/// Default Stripe API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Default bound on a single processor call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Bound on each outbound request.
    timeout: Duration,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Stripe payment processor adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` if the HTTP client cannot be built.
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn map_send_error(err: reqwest::Error) -> PaymentError {
        if err.is_timeout() {
            PaymentError::timeout(format!("Stripe did not respond in time: {}", err))
        } else {
            PaymentError::network(err.to_string())
        }
    }

    /// Maps a non-2xx response to a `PaymentError`, keeping Stripe's own
    /// message and code when the body carries them.
    fn map_error_response(status: StatusCode, body: &str) -> PaymentError {
        let code = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                PaymentErrorCode::AuthenticationError
            }
            StatusCode::BAD_REQUEST | StatusCode::PAYMENT_REQUIRED | StatusCode::NOT_FOUND => {
                PaymentErrorCode::InvalidRequest
            }
            StatusCode::TOO_MANY_REQUESTS => PaymentErrorCode::RateLimitExceeded,
            _ => PaymentErrorCode::ProviderError,
        };

        match serde_json::from_str::<StripeErrorResponse>(body) {
            Ok(parsed) => {
                let message = parsed
                    .error
                    .message
                    .unwrap_or_else(|| format!("Stripe API error ({})", status));
                let error = PaymentError::new(code, message);
                match parsed.error.code.or(parsed.error.error_type) {
                    Some(provider_code) => error.with_provider_code(provider_code),
                    None => error,
                }
            }
            Err(_) => PaymentError::new(code, format!("Stripe API error ({}): {}", status, body)),
        }
    }
}

/// Renders a checkout request as Stripe's bracketed form parameters.
pub fn checkout_form_params(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("mode".to_string(), request.mode.as_str().to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        (
            "payment_intent_data[metadata][orderId]".to_string(),
            request.order_id.clone(),
        ),
    ];

    for (i, method) in request.payment_method_types.iter().enumerate() {
        params.push((format!("payment_method_types[{}]", i), method.clone()));
    }

    for (i, item) in request.line_items.iter().enumerate() {
        params.push((
            format!("line_items[{}][price_data][currency]", i),
            item.currency.clone(),
        ));
        params.push((
            format!("line_items[{}][price_data][product_data][name]", i),
            item.name.clone(),
        ));
        params.push((
            format!("line_items[{}][price_data][unit_amount]", i),
            item.unit_amount.to_string(),
        ));
        params.push((format!("line_items[{}][quantity]", i), item.quantity.to_string()));
    }

    params
}

#[async_trait]
impl PaymentProcessor for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = checkout_form_params(&request);

        tracing::debug!(
            order_id = %request.order_id,
            line_items = request.line_items.len(),
            "Creating Stripe checkout session"
        );

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error = Self::map_error_response(status, &error_text);
            tracing::warn!(
                status = status.as_u16(),
                code = %error.code,
                provider_code = ?error.provider_code,
                "Stripe rejected checkout session"
            );
            return Err(error);
        }

        let stripe_session: StripeCheckoutSession = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let url = stripe_session.url.ok_or_else(|| {
            PaymentError::provider(format!(
                "Stripe session {} has no checkout url",
                stripe_session.id
            ))
        })?;

        Ok(CheckoutSession {
            id: stripe_session.id,
            url,
            success_url: stripe_session.success_url.unwrap_or(request.success_url),
            cancel_url: stripe_session.cancel_url.unwrap_or(request.cancel_url),
        })
    }
}

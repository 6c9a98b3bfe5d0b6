//! CreatePaymentSessionHandler - Command handler for opening a hosted checkout.
//!
//! Validates the order, maps its items to processor price descriptors and makes
//! a single call to the payment processor. Nothing is stored locally.

use std::sync::Arc;

use crate::domain::foundation::ValidationError;
use crate::domain::payment::CheckoutRequest;
use crate::ports::{
    CheckoutMode, CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentProcessor,
};

/// Command to open a checkout session for an order.
#[derive(Debug, Clone)]
pub struct CreatePaymentSessionCommand {
    pub request: CheckoutRequest,
}

/// Result of a successful session creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePaymentSessionResult {
    /// Processor-hosted checkout page.
    pub url: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl From<CheckoutSession> for CreatePaymentSessionResult {
    fn from(session: CheckoutSession) -> Self {
        Self {
            url: session.url,
            success_url: session.success_url,
            cancel_url: session.cancel_url,
        }
    }
}

/// Error type for creating a payment session.
#[derive(Debug, Clone, PartialEq)]
pub enum CreatePaymentSessionError {
    /// Request failed validation; no outbound call was made.
    Validation(ValidationError),
    /// Processor call failed; propagated as-is.
    Processor(PaymentError),
}

impl std::fmt::Display for CreatePaymentSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreatePaymentSessionError::Validation(err) => write!(f, "{}", err),
            CreatePaymentSessionError::Processor(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CreatePaymentSessionError {}

impl From<ValidationError> for CreatePaymentSessionError {
    fn from(err: ValidationError) -> Self {
        CreatePaymentSessionError::Validation(err)
    }
}

impl From<PaymentError> for CreatePaymentSessionError {
    fn from(err: PaymentError) -> Self {
        CreatePaymentSessionError::Processor(err)
    }
}

/// Handler for opening hosted checkout sessions.
///
/// Redirect URLs are fixed at construction from configuration; callers cannot
/// override them.
pub struct CreatePaymentSessionHandler {
    payment_processor: Arc<dyn PaymentProcessor>,
    success_url: String,
    cancel_url: String,
}

impl CreatePaymentSessionHandler {
    pub fn new(
        payment_processor: Arc<dyn PaymentProcessor>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            payment_processor,
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentSessionCommand,
    ) -> Result<CreatePaymentSessionResult, CreatePaymentSessionError> {
        let request = cmd.request;

        // 1. Validate before any outbound call
        request.validate()?;

        // 2. Build the processor request
        let session_request = CheckoutSessionRequest {
            line_items: request.line_item_prices(),
            mode: CheckoutMode::Payment,
            payment_method_types: vec!["card".to_string()],
            order_id: request.order_id.clone(),
            success_url: self.success_url.clone(),
            cancel_url: self.cancel_url.clone(),
        };

        // 3. Single call, no retry
        let session = self
            .payment_processor
            .create_checkout_session(session_request)
            .await
            .map_err(|e| {
                tracing::warn!(
                    order_id = %request.order_id,
                    error = %e,
                    "Checkout session creation failed"
                );
                e
            })?;

        tracing::info!(
            order_id = %request.order_id,
            session_id = %session.id,
            items = request.items.len(),
            "Checkout session created"
        );

        Ok(session.into())
    }
}

//! Mock payment processor for testing.
//!
//! Provides a configurable implementation of `PaymentProcessor` for unit and
//! integration tests. Supports:
//! - Error injection
//! - Request capture

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentProcessor};

/// Mock payment processor for testing.
///
/// Clones share state, so a test can keep one handle for assertions while the
/// application owns another.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProcessor::new();
///
/// mock.set_error(PaymentError::authentication("bad key"));
///
/// let result = mock.create_checkout_session(request).await;
/// assert_eq!(mock.requests().len(), 1);
/// ```
#[derive(Default)]
pub struct MockPaymentProcessor {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Error to return on next call (consumed).
    next_error: Option<PaymentError>,

    /// Every request received, in order.
    requests: Vec<CheckoutSessionRequest>,
}

impl MockPaymentProcessor {
    /// Create a new mock processor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose first call fails with `error`.
    pub fn failing(error: PaymentError) -> Self {
        let mock = Self::new();
        mock.set_error(error);
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set an error to return on the next call.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertion Helpers
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<CheckoutSessionRequest> {
        self.state().requests.clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.state().requests.len()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.inner
            .lock()
            .expect("MockPaymentProcessor: state lock poisoned")
    }
}

impl Clone for MockPaymentProcessor {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let mut state = self.state();
        state.requests.push(request.clone());

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        let id = format!("cs_mock_{}", uuid::Uuid::new_v4().simple());
        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.com/c/pay/{}", id),
            id,
            success_url: request.success_url,
            cancel_url: request.cancel_url,
        })
    }
}

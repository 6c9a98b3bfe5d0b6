//! Stripe webhook signature verification.
//!
//! Implements verification of Stripe webhook signatures using HMAC-SHA256 over
//! the exact request bytes. Includes timestamp validation to prevent replay
//! attacks.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::stripe_event::StripeEvent;
use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed age for webhook events (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// Decodable v1 signatures (HMAC-SHA256). More than one is sent while a
    /// secret is being rolled.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...]`. Other
    /// schemes (`v0`, future ones) and `v1` entries that are not hex are
    /// skipped; only one of the remaining `v1` entries has to match.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedHeader` when there is no usable
    /// timestamp or no decodable `v1` signature.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures: Vec<Vec<u8>> = Vec::new();

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        WebhookError::MalformedHeader("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    if let Ok(signature) = hex::decode(value) {
                        v1_signatures.push(signature);
                    }
                }
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| WebhookError::MalformedHeader("missing timestamp".to_string()))?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::MalformedHeader(
                "no v1 signature found".to_string(),
            ));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifier for Stripe webhook signatures.
///
/// Holds the shared signing secret.
#[derive(Clone)]
pub struct StripeWebhookVerifier {
    /// The webhook signing secret from Stripe dashboard.
    secret: SecretString,
    /// Maximum event age in seconds.
    tolerance_secs: i64,
}

impl StripeWebhookVerifier {
    /// Creates a new verifier with the given webhook secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            tolerance_secs: MAX_EVENT_AGE_SECS,
        }
    }

    /// Overrides the replay window (default 300 seconds).
    pub fn with_tolerance_secs(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Verifies the webhook signature and parses the event.
    ///
    /// # Verification Steps
    ///
    /// 1. Parse the signature header
    /// 2. Validate timestamp is within acceptable range
    /// 3. Compute expected signature using HMAC-SHA256 over the raw bytes
    /// 4. Compare against every v1 signature using constant-time comparison
    /// 5. Parse the JSON payload into a StripeEvent
    ///
    /// # Errors
    ///
    /// - `MalformedHeader` - Header could not be parsed
    /// - `TimestampOutOfRange` - Event is older than the tolerance
    /// - `InvalidSignature` - No v1 signature matched
    /// - `InvalidPayload` - Body is not JSON
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp, chrono::Utc::now().timestamp())?;

        let expected_signature = self.compute_signature(header.timestamp, payload);

        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected_signature, candidate));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        let body: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

        Ok(StripeEvent::from_value(body))
    }

    /// Rejects signatures older than the tolerance.
    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        if now - timestamp > self.tolerance_secs {
            return Err(WebhookError::TimestampOutOfRange);
        }
        Ok(())
    }

    /// Computes the HMAC-SHA256 signature of `"{timestamp}." ++ payload`.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Builds a `Stripe-Signature` header value for `payload`, the way Stripe signs
/// deliveries. Used by test suites to forge valid webhooks.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_test_secret_12345";

    const CHARGE_EVENT: &str = r#"{"id":"evt_test123","type":"charge.succeeded","created":1704067200,"data":{"object":{"id":"ch_1"}},"livemode":false}"#;

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    // ══════════════════════════════════════════════════════════════
    // SignatureHeader Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_header_with_v1_only() {
        let header_str = format!("t=1234567890,v1={}", "a".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signatures.len(), 1);
        assert_eq!(header.v1_signatures[0].len(), 32);
    }

    #[test]
    fn parse_header_collects_every_v1() {
        let header_str = format!(
            "t=1234567890,v1={},v1={},v0={}",
            "a".repeat(64),
            "b".repeat(64),
            "c".repeat(64)
        );

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.v1_signatures.len(), 2);
    }

    #[test]
    fn parse_header_ignores_unknown_fields() {
        let header_str = format!("t=1234567890,v1={},v2=future,scheme=hmac", "a".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
    }

    #[test]
    fn parse_header_missing_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("v1={}", "a".repeat(64)));
        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_missing_v1_fails() {
        let result = SignatureHeader::parse("t=1234567890");
        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_invalid_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("t=soon,v1={}", "a".repeat(64)));
        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_skips_undecodable_v1() {
        let header_str = format!("t=1234567890,v1=zz,v1={},v0=not_hex", "a".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.v1_signatures, vec![vec![0xaa; 32]]);
    }

    #[test]
    fn parse_header_with_only_undecodable_v1_fails() {
        let result = SignatureHeader::parse("t=1234567890,v1=not_valid_hex");
        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_empty_fails() {
        let result = SignatureHeader::parse("");
        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = sign_payload(TEST_SECRET, now(), CHARGE_EVENT.as_bytes());

        let event = verifier
            .verify_and_parse(CHARGE_EVENT.as_bytes(), &header)
            .unwrap();

        assert_eq!(event.id, "evt_test123");
        assert_eq!(event.event_type, "charge.succeeded");
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let verifier = StripeWebhookVerifier::new("whsec_other");
        let header = sign_payload(TEST_SECRET, now(), CHARGE_EVENT.as_bytes());

        let result = verifier.verify_and_parse(CHARGE_EVENT.as_bytes(), &header);

        assert_eq!(result.unwrap_err(), WebhookError::InvalidSignature);
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = sign_payload(TEST_SECRET, now(), CHARGE_EVENT.as_bytes());
        let tampered = CHARGE_EVENT.replace("ch_1", "ch_2");

        let result = verifier.verify_and_parse(tampered.as_bytes(), &header);

        assert_eq!(result.unwrap_err(), WebhookError::InvalidSignature);
    }

    #[test]
    fn verify_uses_exact_bytes_not_reserialized_json() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let spaced = r#"{ "id": "evt_1", "type": "charge.failed", "data": { "object": {} } }"#;
        let compact = r#"{"id":"evt_1","type":"charge.failed","data":{"object":{}}}"#;
        let header = sign_payload(TEST_SECRET, now(), spaced.as_bytes());

        assert!(verifier.verify_and_parse(spaced.as_bytes(), &header).is_ok());
        assert_eq!(
            verifier
                .verify_and_parse(compact.as_bytes(), &header)
                .unwrap_err(),
            WebhookError::InvalidSignature
        );
    }

    #[test]
    fn verify_accepts_any_matching_v1() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let signed = sign_payload(TEST_SECRET, now(), CHARGE_EVENT.as_bytes());
        let (t_part, v1_part) = signed.split_once(',').unwrap();
        let header = format!("{},v1={},{}", t_part, "0".repeat(64), v1_part);

        assert!(verifier
            .verify_and_parse(CHARGE_EVENT.as_bytes(), &header)
            .is_ok());
    }

    #[test]
    fn verify_ignores_undecodable_v1_next_to_a_match() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = format!(
            "{},v1=zz",
            sign_payload(TEST_SECRET, now(), CHARGE_EVENT.as_bytes())
        );

        assert!(verifier
            .verify_and_parse(CHARGE_EVENT.as_bytes(), &header)
            .is_ok());
    }

    #[test]
    fn verify_accepts_json_without_envelope_fields() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let payload = br#"{"type":"charge.failed"}"#;
        let header = sign_payload(TEST_SECRET, now(), payload);

        let event = verifier.verify_and_parse(payload, &header).unwrap();

        assert_eq!(event.event_type, "charge.failed");
        assert_eq!(event.id, "");
    }

    #[test]
    fn verify_rejects_non_json_body_after_valid_signature() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let payload = b"not json";
        let header = sign_payload(TEST_SECRET, now(), payload);

        let result = verifier.verify_and_parse(payload, &header);

        assert!(matches!(result, Err(WebhookError::InvalidPayload(_))));
    }

    #[test]
    fn verify_rejects_stale_delivery() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = sign_payload(TEST_SECRET, now() - 600, CHARGE_EVENT.as_bytes());

        let result = verifier.verify_and_parse(CHARGE_EVENT.as_bytes(), &header);

        assert_eq!(result.unwrap_err(), WebhookError::TimestampOutOfRange);
    }

    // ══════════════════════════════════════════════════════════════
    // Timestamp Validation Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn timestamp_at_boundary_succeeds() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        assert!(verifier.validate_timestamp(1_000 - 300, 1_000).is_ok());
    }

    #[test]
    fn timestamp_just_past_boundary_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        assert_eq!(
            verifier.validate_timestamp(1_000 - 301, 1_000),
            Err(WebhookError::TimestampOutOfRange)
        );
    }

    #[test]
    fn future_timestamp_is_accepted() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        assert!(verifier.validate_timestamp(1_120, 1_000).is_ok());
    }

    #[test]
    fn verify_accepts_delivery_stamped_ahead_of_local_clock() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = sign_payload(TEST_SECRET, now() + 120, CHARGE_EVENT.as_bytes());

        assert!(verifier
            .verify_and_parse(CHARGE_EVENT.as_bytes(), &header)
            .is_ok());
    }

    #[test]
    fn custom_tolerance_is_respected() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET).with_tolerance_secs(10);
        assert_eq!(
            verifier.validate_timestamp(1_000 - 11, 1_000),
            Err(WebhookError::TimestampOutOfRange)
        );
    }
}

//! Facilitator Client
//!
//! Verifies and settles payment proofs against the external x402
//! facilitator. The envelope a client submits is base64-encoded JSON;
//! decoding failures and facilitator rejections both come back as
//! recoverable [`SettleOutcome`] failures so the client can retry with a
//! corrected proof.
//!
//! Replay of an already-settled proof is rejected by the facilitator,
//! not tracked here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::payment::PaymentOption;
use crate::payment::requirements::X402_VERSION;
use crate::types::{SettleOutcome, SettlementClient};

/// Decode the `payment-signature` header value into the payment payload
/// it carries. The envelope is base64 over UTF-8 JSON.
pub fn decode_payment_envelope(header_value: &str) -> Result<Value> {
    let bytes = BASE64
        .decode(header_value.trim())
        .context("Payment envelope is not valid base64")?;
    let text = String::from_utf8(bytes).context("Payment envelope is not valid UTF-8")?;
    serde_json::from_str(&text).context("Payment envelope is not valid JSON")
}

/// HTTP client for the settlement facilitator's verify/settle API.
pub struct FacilitatorClient {
    base_url: String,
    http: Client,
}

impl FacilitatorClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// POST a verify/settle request and interpret the facilitator's
    /// JSON verdict.
    async fn post_step(
        &self,
        step: &str,
        payment_payload: &Value,
        requirements: &PaymentOption,
    ) -> Result<SettleOutcome> {
        let url = format!("{}/{}", self.base_url, step);
        let body = json!({
            "x402Version": X402_VERSION,
            "paymentPayload": payment_payload,
            "paymentRequirements": requirements,
        });

        let resp = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Facilitator {} request failed", step))?;

        let status = resp.status();
        let data: Value = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse facilitator {} response", step))?;

        debug!("Facilitator {} responded {}: {}", step, status, data);

        // Verify responses use `isValid`/`invalidReason`, settle
        // responses use `success`/`errorReason`.
        let passed = data["isValid"]
            .as_bool()
            .or_else(|| data["success"].as_bool())
            .unwrap_or(false);

        if !passed || !status.is_success() {
            let reason = data["invalidReason"]
                .as_str()
                .or_else(|| data["errorReason"].as_str())
                .or_else(|| data["error"].as_str())
                .unwrap_or("payment rejected by facilitator");
            return Ok(SettleOutcome::failed(reason));
        }

        Ok(SettleOutcome::ok(
            data["transaction"].as_str().map(|s| s.to_string()),
        ))
    }
}

#[async_trait]
impl SettlementClient for FacilitatorClient {
    /// Verify the payment first, then settle it. A verification failure
    /// stops before settlement so nothing moves on-chain for a bad
    /// proof.
    async fn verify_and_settle(
        &self,
        payment_payload: &Value,
        requirements: &PaymentOption,
    ) -> Result<SettleOutcome> {
        let verified = self.post_step("verify", payment_payload, requirements).await?;
        if !verified.success {
            return Ok(verified);
        }

        self.post_step("settle", payment_payload, requirements).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_round_trip() {
        let payload = json!({"signedTransaction": "0xdeadbeef", "nonce": 7});
        let encoded = BASE64.encode(serde_json::to_string(&payload).unwrap());
        assert_eq!(decode_payment_envelope(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let err = decode_payment_envelope("not base64!!!").unwrap_err();
        assert!(err.to_string().contains("base64"));
    }

    #[test]
    fn test_decode_rejects_non_json_payload() {
        let encoded = BASE64.encode("just some text");
        let err = decode_payment_envelope(&encoded).unwrap_err();
        assert!(err.to_string().contains("JSON"));
    }

    #[test]
    fn test_decode_trims_header_whitespace() {
        let encoded = format!("  {}  ", BASE64.encode("{\"a\":1}"));
        assert_eq!(decode_payment_envelope(&encoded).unwrap(), json!({"a": 1}));
    }
}

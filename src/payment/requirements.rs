//! Payment Challenge Construction
//!
//! Builds the x402 v2 payment requirements advertised on a 402 response.
//! The challenge is a pure function of configuration and the resource
//! being gated, so it is regenerated on demand rather than stored:
//! fetching the same resource twice yields byte-identical challenges.

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

/// The x402 protocol revision this service speaks.
pub const X402_VERSION: u32 = 2;

/// How long a challenge stays economically meaningful to the client.
/// Advisory only; the skill store TTL is the hard server-side expiry.
pub const MAX_TIMEOUT_SECONDS: u32 = 300;

/// The resource a challenge unlocks. Carrying the URL here is what ties
/// a proof to one resource: verification reconstructs the requirements
/// for the requested URL, so a proof made for another resource cannot
/// match.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    pub url: String,
    pub description: String,
    pub mime_type: String,
}

/// One acceptable way to pay. Price, recipient, and network come from
/// configuration, not negotiation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOption {
    pub scheme: String,
    pub network: String,
    pub amount: String,
    pub asset: String,
    pub pay_to: String,
    pub max_timeout_seconds: u32,
}

/// Full payment challenge returned with an HTTP 402.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    pub x402_version: u32,
    pub resource: ResourceInfo,
    pub accepts: Vec<PaymentOption>,
}

/// Build the payment requirements for a gated resource URL.
pub fn payment_requirements(config: &AppConfig, resource_url: &str) -> PaymentRequirements {
    PaymentRequirements {
        x402_version: X402_VERSION,
        resource: ResourceInfo {
            url: resource_url.to_string(),
            description: "Claude Code skill package download".to_string(),
            mime_type: "application/zip".to_string(),
        },
        accepts: vec![PaymentOption {
            scheme: "exact".to_string(),
            network: config.network.clone(),
            amount: config.skill_price.clone(),
            asset: config.asset.clone(),
            pay_to: config.payout_address.clone(),
            max_timeout_seconds: MAX_TIMEOUT_SECONDS,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            payout_address: "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_challenge_carries_resource_url() {
        let req = payment_requirements(&config(), "http://localhost:3000/api/downloads/abc");
        assert_eq!(req.resource.url, "http://localhost:3000/api/downloads/abc");
        assert_eq!(req.resource.mime_type, "application/zip");
    }

    #[test]
    fn test_challenge_is_deterministic() {
        let cfg = config();
        let a = payment_requirements(&cfg, "http://localhost:3000/api/downloads/abc");
        let b = payment_requirements(&cfg, "http://localhost:3000/api/downloads/abc");
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_accepts_reflect_configuration() {
        let req = payment_requirements(&config(), "http://x/api/downloads/1");
        let option = &req.accepts[0];
        assert_eq!(option.scheme, "exact");
        assert_eq!(option.amount, "2000000");
        assert_eq!(option.asset, "STX");
        assert_eq!(option.pay_to, "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7");
        assert_eq!(option.max_timeout_seconds, 300);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let req = payment_requirements(&config(), "http://x/api/downloads/1");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["x402Version"], 2);
        assert!(json["resource"]["mimeType"].is_string());
        assert!(json["accepts"][0]["payTo"].is_string());
        assert!(json["accepts"][0]["maxTimeoutSeconds"].is_number());
    }

    #[test]
    fn test_empty_payout_address_passes_through() {
        // Misconfiguration is surfaced at startup, not validated here.
        let req = payment_requirements(&AppConfig::default(), "http://x/api/downloads/1");
        assert_eq!(req.accepts[0].pay_to, "");
    }
}

//! Stackable Configuration
//!
//! All runtime configuration comes from the environment. Missing values
//! fall back to working defaults, except the payout address: without it
//! the payment gate still runs but issues challenges with an empty
//! recipient, which is logged as a misconfiguration at startup.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable names, kept in one place so the README and the
/// loader cannot drift apart.
pub const ENV_FACILITATOR_URL: &str = "X402_FACILITATOR_URL";
pub const ENV_NETWORK: &str = "X402_NETWORK";
pub const ENV_PAYOUT_ADDRESS: &str = "PAYOUT_ADDRESS";
pub const ENV_SKILL_PRICE: &str = "SKILL_PRICE";
pub const ENV_GENERATOR_API_URL: &str = "GENERATOR_API_URL";
pub const ENV_GENERATOR_API_KEY: &str = "GENERATOR_API_KEY";
pub const ENV_GENERATOR_MODEL: &str = "GENERATOR_MODEL";
pub const ENV_PUBLIC_BASE_URL: &str = "PUBLIC_BASE_URL";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Settlement facilitator endpoint.
    pub facilitator_url: String,
    /// CAIP-2 network identifier for the payment chain.
    pub network: String,
    /// Address that receives skill payments. Empty means misconfigured.
    pub payout_address: String,
    /// Unit price per skill download, in the asset's smallest denomination.
    pub skill_price: String,
    /// Asset ticker advertised in payment challenges.
    pub asset: String,
    /// OpenAI-compatible chat completions endpoint for skill generation.
    pub generator_api_url: String,
    pub generator_api_key: String,
    pub generator_model: String,
    /// External base URL used to build gated resource URLs.
    pub public_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            facilitator_url: "https://facilitator.stacksx402.com".to_string(),
            network: "stacks:2147483648".to_string(),
            payout_address: String::new(),
            // 2 STX in microSTX
            skill_price: "2000000".to_string(),
            asset: "STX".to_string(),
            generator_api_url: "https://api.openai.com".to_string(),
            generator_api_key: String::new(),
            generator_model: "gpt-4o".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// Load the configuration from the environment, merging defaults for
    /// anything unset or empty.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            facilitator_url: env_or(ENV_FACILITATOR_URL, defaults.facilitator_url),
            network: env_or(ENV_NETWORK, defaults.network),
            payout_address: env_or(ENV_PAYOUT_ADDRESS, defaults.payout_address),
            skill_price: env_or(ENV_SKILL_PRICE, defaults.skill_price),
            asset: defaults.asset,
            generator_api_url: env_or(ENV_GENERATOR_API_URL, defaults.generator_api_url),
            generator_api_key: env_or(ENV_GENERATOR_API_KEY, defaults.generator_api_key),
            generator_model: env_or(ENV_GENERATOR_MODEL, defaults.generator_model),
            public_base_url: env_or(ENV_PUBLIC_BASE_URL, defaults.public_base_url),
        };

        if config.payout_address.is_empty() {
            warn!(
                "{} is not set; payment challenges will carry an empty recipient",
                ENV_PAYOUT_ADDRESS
            );
        }

        config
    }

    /// Absolute URL of the gated download resource for a stored skill id.
    pub fn download_resource_url(&self, skill_id: &str) -> String {
        format!(
            "{}/api/downloads/{}",
            self.public_base_url.trim_end_matches('/'),
            skill_id
        )
    }
}

/// Read an environment variable, falling back to `default` when the
/// variable is unset or empty.
fn env_or(name: &str, default: String) -> String {
    match std::env::var(name) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => default,
    }
}

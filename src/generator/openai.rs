//! OpenAI-Compatible Generator Client
//!
//! Wraps a /v1/chat/completions endpoint for skill generation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::AppConfig;
use crate::types::GeneratorClient;

/// Chat completions client for the skill generator model.
pub struct OpenAiGenerator {
    api_url: String,
    api_key: String,
    model: String,
    http: Client,
}

impl OpenAiGenerator {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.generator_api_url.clone(),
            config.generator_api_key.clone(),
            config.generator_model.clone(),
        )
    }
}

#[async_trait]
impl GeneratorClient for OpenAiGenerator {
    /// Send one chat completion request and return the raw assistant
    /// text. An empty completion is returned as-is; the handler decides
    /// how to report it.
    async fn generate(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_message },
            ],
            "temperature": 0.7,
            "max_tokens": 4096,
            "stream": false,
        });

        let url = format!("{}/v1/chat/completions", self.api_url);
        let resp = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("Generation request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Generation error: {}: {}", status.as_u16(), text);
        }

        let data: Value = resp
            .json()
            .await
            .context("Failed to parse generation response")?;

        let content = data["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .unwrap_or("")
            .to_string();

        Ok(content)
    }
}

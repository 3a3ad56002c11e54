//! Stackable - Type Definitions
//!
//! Shared types for the skill-builder pipeline plus the traits that
//! abstract the two external collaborators: the generation backend and
//! the payment settlement facilitator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ─── Skill Metadata ──────────────────────────────────────────────

/// Identifying fields for a skill, shown in the editor and written into
/// the packaged `metadata.json`. User edits to these fields win over
/// whatever the raw frontmatter says at packaging time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            name: "untitled-skill".to_string(),
            description: String::new(),
            version: "1.0.0".to_string(),
        }
    }
}

/// The payload handed off between storing a skill and its paid download.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillPackageData {
    pub skill_content: String,
    pub metadata: Metadata,
}

// ─── Validation ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation finding. `line` is a best-effort hint, present
/// only where it is meaningful.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationMessage {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl ValidationMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            line: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line: None,
        }
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// Outcome of validating a skill document. `valid` is always exactly
/// `errors.is_empty()`; warnings never affect it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationMessage>,
    pub warnings: Vec<ValidationMessage>,
}

impl ValidationResult {
    pub fn from_messages(
        errors: Vec<ValidationMessage>,
        warnings: Vec<ValidationMessage>,
    ) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

// ─── External Collaborators ──────────────────────────────────────

/// The natural-language generation backend. Given a composed instruction,
/// returns raw (possibly badly formatted) skill markdown. May fail or
/// return an empty string; callers treat both as upstream errors.
#[async_trait]
pub trait GeneratorClient: Send + Sync {
    async fn generate(&self, system_prompt: &str, user_message: &str) -> anyhow::Result<String>;
}

/// Result of asking the facilitator to verify and settle a payment.
/// Failure is expected, recoverable data rather than an error: the
/// client corrects its proof and retries.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
}

impl SettleOutcome {
    pub fn ok(transaction: Option<String>) -> Self {
        Self {
            success: true,
            error_reason: None,
            transaction,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error_reason: Some(reason.into()),
            transaction: None,
        }
    }
}

/// The external settlement verifier. Takes the decoded payment payload
/// from the client envelope plus the requirements the server expects for
/// this resource, and confirms the payment on the settlement network.
#[async_trait]
pub trait SettlementClient: Send + Sync {
    async fn verify_and_settle(
        &self,
        payment_payload: &serde_json::Value,
        requirements: &crate::payment::PaymentOption,
    ) -> anyhow::Result<SettleOutcome>;
}

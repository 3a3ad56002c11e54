//! Request Handlers
//!
//! Generation, validation, templates, and the payment-gated download
//! flow. The download GET is where the 402 handshake lives: no proof
//! header yields the challenge, a bad proof yields a retryable failure,
//! a settled proof delivers the zip exactly once and consumes the
//! stored entry.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::generator::{compose_user_message, SYSTEM_PROMPT};
use crate::package;
use crate::payment::{
    decode_payment_envelope, payment_requirements, PaymentRequirements,
    PAYMENT_REQUIRED_HEADER, PAYMENT_SIGNATURE_HEADER,
};
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::AppState;
use crate::skill::metadata::extract_metadata;
use crate::skill::normalize::normalize;
use crate::skill::templates::SKILL_TEMPLATES;
use crate::skill::validate::validate;
use crate::types::{Metadata, SkillPackageData};

// ─── Health & Templates ──────────────────────────────────────────

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_templates() -> Json<Value> {
    Json(json!({ "templates": &*SKILL_TEMPLATES }))
}

// ─── Generation ──────────────────────────────────────────────────

/// POST /api/skills — generate a skill from a natural-language prompt,
/// optionally seeded with a starter template's content.
pub async fn generate_skill(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let prompt = match body.get("prompt").and_then(Value::as_str) {
        Some(p) if !p.trim().is_empty() => p,
        _ => return Err(ApiError::BadRequest("prompt is required".to_string())),
    };
    let template = body.get("template").and_then(Value::as_str);

    let user_message = compose_user_message(prompt, template);

    let raw = state
        .generator
        .generate(SYSTEM_PROMPT, &user_message)
        .await
        .map_err(ApiError::Upstream)?;

    if raw.trim().is_empty() {
        return Err(ApiError::EmptyGeneration);
    }

    let skill_content = normalize(&raw);

    let extracted = extract_metadata(&skill_content);
    let metadata = Metadata {
        // Generated skills default to "created-skill" when the model
        // produced no usable name.
        name: if extracted.name == "untitled-skill" {
            "created-skill".to_string()
        } else {
            extracted.name
        },
        description: extracted.description,
        version: "1.0.0".to_string(),
    };

    info!("Generated skill '{}' ({} bytes)", metadata.name, skill_content.len());

    Ok(Json(json!({
        "skillContent": skill_content,
        "metadata": metadata,
    })))
}

/// POST /api/skills/validate — run the structural validator and return
/// the findings as data.
pub async fn validate_skill(Json(body): Json<Value>) -> ApiResult<Json<Value>> {
    let content = match body.get("skillContent").and_then(Value::as_str) {
        Some(c) => c,
        None => return Err(ApiError::BadRequest("skillContent is required".to_string())),
    };

    Ok(Json(serde_json::to_value(validate(content)).map_err(
        |e| ApiError::Internal(e.into()),
    )?))
}

// ─── Download Flow ───────────────────────────────────────────────

/// POST /api/downloads — stage a skill payload under a fresh random id,
/// one id per download attempt.
pub async fn prepare_download(
    State(state): State<AppState>,
    Json(body): Json<SkillPackageData>,
) -> Json<Value> {
    let skill_id = uuid::Uuid::new_v4().to_string();
    state.store.put(&skill_id, body);
    Json(json!({ "stored": true, "skillId": skill_id }))
}

/// POST /api/downloads/:skill_id — stage a skill payload under a
/// client-chosen id.
pub async fn store_skill(
    State(state): State<AppState>,
    Path(skill_id): Path<String>,
    Json(body): Json<SkillPackageData>,
) -> Json<Value> {
    state.store.put(&skill_id, body);
    Json(json!({ "stored": true, "skillId": skill_id }))
}

/// GET /api/downloads/:skill_id — the payment gate.
pub async fn download_skill(
    State(state): State<AppState>,
    Path(skill_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    // An expired or consumed entry is gone regardless of payment state.
    let skill_data = state.store.get(&skill_id).ok_or(ApiError::NotFound)?;

    let resource_url = state.config.download_resource_url(&skill_id);
    let requirements = payment_requirements(&state.config, &resource_url);

    let signature = headers
        .get(PAYMENT_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let signature = match signature {
        Some(sig) => sig,
        None => return Ok(challenge_response(&requirements)),
    };

    // Decode the proof envelope; a malformed envelope is a retryable
    // payment failure, not a server error.
    let payload = match decode_payment_envelope(signature) {
        Ok(p) => p,
        Err(e) => {
            warn!("Rejected malformed payment envelope for {}: {:#}", skill_id, e);
            return Ok(verification_failed_response(Some(e.to_string())));
        }
    };

    match state
        .settlement
        .verify_and_settle(&payload, &requirements.accepts[0])
        .await
    {
        Ok(outcome) if outcome.success => {
            info!(
                "Payment settled for skill {} (tx: {})",
                skill_id,
                outcome.transaction.as_deref().unwrap_or("n/a")
            );
        }
        Ok(outcome) => {
            return Ok(verification_failed_response(outcome.error_reason));
        }
        Err(e) => {
            error!("Payment verification error for {}: {:#}", skill_id, e);
            return Ok(verification_failed_response(None));
        }
    }

    // Payment settled: assemble the bundle, then consume the entry so a
    // second request (even with a reused proof) finds nothing.
    let zip_bytes = package::create_skill_zip(&skill_data).map_err(ApiError::Internal)?;
    let filename = package::suggested_filename(&skill_data);
    state.store.delete(&skill_id);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .header(header::CONTENT_LENGTH, zip_bytes.len())
        .body(zip_bytes.into())
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(response)
}

/// 402 with the JSON challenge in the body and echoed in the
/// `payment-required` header.
fn challenge_response(requirements: &PaymentRequirements) -> Response {
    let body = serde_json::to_string(requirements).unwrap_or_default();
    let mut response = (
        StatusCode::PAYMENT_REQUIRED,
        [(header::CONTENT_TYPE, "application/json")],
        body.clone(),
    )
        .into_response();

    if let Ok(value) = body.parse() {
        response.headers_mut().insert(PAYMENT_REQUIRED_HEADER, value);
    }
    response
}

/// 402 for a failed verification, carrying the facilitator's reason
/// when there is one.
fn verification_failed_response(reason: Option<String>) -> Response {
    let mut body = json!({ "error": "Payment verification failed" });
    if let Some(reason) = reason {
        body["reason"] = json!(reason);
    }
    (StatusCode::PAYMENT_REQUIRED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;
    use crate::payment::PaymentOption;
    use crate::server::routes::build_router;
    use crate::store::SkillStore;
    use crate::types::{GeneratorClient, SettleOutcome, SettlementClient};

    /// Canned generator: fenced output with a missing closing
    /// frontmatter delimiter, the kind of damage normalize must repair.
    struct FixedGenerator(String);

    #[async_trait]
    impl GeneratorClient for FixedGenerator {
        async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    /// Settlement mock: accepts payloads containing `"valid": true`.
    struct FakeSettlement;

    #[async_trait]
    impl SettlementClient for FakeSettlement {
        async fn verify_and_settle(
            &self,
            payload: &Value,
            _requirements: &PaymentOption,
        ) -> Result<SettleOutcome> {
            if payload["valid"] == json!(true) {
                Ok(SettleOutcome::ok(Some("0xsettled".to_string())))
            } else {
                Ok(SettleOutcome::failed("invalid signature"))
            }
        }
    }

    fn test_state(generated: &str) -> AppState {
        let config = AppConfig {
            payout_address: "SP000TESTADDR".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            ..AppConfig::default()
        };
        AppState::new(
            config,
            Arc::new(SkillStore::with_ttl(Duration::from_secs(3600))),
            Arc::new(FixedGenerator(generated.to_string())),
            Arc::new(FakeSettlement),
        )
    }

    fn proof(valid: bool) -> String {
        BASE64.encode(json!({ "signedTransaction": "0xabc", "valid": valid }).to_string())
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const MESSY_OUTPUT: &str = "```markdown\n\n---\nname: linter\ndescription: \"Lints code on demand\"\n---\n# /linter - Linter\n\n## Triggers\n- lint requests\n\n## Usage\n```\n/linter\n```\n\n## Behavioral Flow\n1. Lint\n\n## Examples\n```\n/linter src\n```\n\n## Boundaries\n- No auto-fix\n```";

    #[tokio::test]
    async fn test_generate_repairs_and_extracts() {
        let app = build_router(test_state(MESSY_OUTPUT));
        let response = app
            .oneshot(post_json(
                "/api/skills",
                json!({ "prompt": "make a linter skill" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;

        let content = body["skillContent"].as_str().unwrap();
        assert!(content.starts_with("---\n"));
        assert!(!content.contains("```markdown"));
        assert_eq!(body["metadata"]["name"], "linter");
        assert_eq!(body["metadata"]["description"], "Lints code on demand");
        assert_eq!(body["metadata"]["version"], "1.0.0");

        // The repaired document passes validation cleanly.
        let result = validate(content);
        assert!(result.valid, "errors: {:?}", result.errors);
    }

    #[tokio::test]
    async fn test_generate_without_prompt_is_400() {
        let app = build_router(test_state(MESSY_OUTPUT));
        let response = app
            .oneshot(post_json("/api/skills", json!({ "template": "x" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "prompt is required");
    }

    #[tokio::test]
    async fn test_generate_empty_output_is_500() {
        let app = build_router(test_state("   "));
        let response = app
            .oneshot(post_json("/api/skills", json!({ "prompt": "anything" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"],
            "Failed to generate skill content"
        );
    }

    #[tokio::test]
    async fn test_generate_defaults_name_when_missing() {
        let app = build_router(test_state("# Just a body\n\n## Triggers\n\n## Usage\n"));
        let response = app
            .oneshot(post_json("/api/skills", json!({ "prompt": "anything" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["metadata"]["name"], "created-skill");
    }

    #[tokio::test]
    async fn test_validate_endpoint_reports_findings() {
        let app = build_router(test_state(MESSY_OUTPUT));
        let response = app
            .oneshot(post_json(
                "/api/skills/validate",
                json!({ "skillContent": "" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["valid"], false);
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_templates_endpoint_lists_catalog() {
        let app = build_router(test_state(MESSY_OUTPUT));
        let response = app
            .oneshot(Request::get("/api/templates").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(!body["templates"].as_array().unwrap().is_empty());
    }

    fn stored_payload() -> Value {
        json!({
            "skillContent": "---\nname: abc-skill\ndescription: d\n---\n# T\n\n## Triggers\n\n## Usage\n",
            "metadata": { "name": "abc-skill", "description": "d", "version": "1.0.0" }
        })
    }

    #[tokio::test]
    async fn test_download_without_proof_yields_challenge() {
        let state = test_state(MESSY_OUTPUT);
        let app = build_router(state);

        let store = app
            .clone()
            .oneshot(post_json("/api/downloads/abc", stored_payload()))
            .await
            .unwrap();
        assert_eq!(store.status(), StatusCode::OK);
        assert_eq!(body_json(store).await["stored"], true);

        let response = app
            .clone()
            .oneshot(Request::get("/api/downloads/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
        assert!(response.headers().contains_key(PAYMENT_REQUIRED_HEADER));

        let body = body_json(response).await;
        assert_eq!(
            body["resource"]["url"],
            "http://localhost:3000/api/downloads/abc"
        );
        assert_eq!(body["accepts"][0]["amount"], "2000000");
    }

    #[tokio::test]
    async fn test_challenge_is_byte_identical_across_fetches() {
        let app = build_router(test_state(MESSY_OUTPUT));
        app.clone()
            .oneshot(post_json("/api/downloads/abc", stored_payload()))
            .await
            .unwrap();

        let mut bodies = Vec::new();
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(Request::get("/api/downloads/abc").body(Body::empty()).unwrap())
                .await
                .unwrap();
            bodies.push(to_bytes(response.into_body(), usize::MAX).await.unwrap());
        }
        assert_eq!(bodies[0], bodies[1]);
    }

    #[tokio::test]
    async fn test_download_with_invalid_proof_is_retryable_402() {
        let app = build_router(test_state(MESSY_OUTPUT));
        app.clone()
            .oneshot(post_json("/api/downloads/abc", stored_payload()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/downloads/abc")
                    .header(PAYMENT_SIGNATURE_HEADER, proof(false))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Payment verification failed");
        assert_eq!(body["reason"], "invalid signature");

        // The entry is still there: a corrected retry succeeds.
        let retry = app
            .clone()
            .oneshot(
                Request::get("/api/downloads/abc")
                    .header(PAYMENT_SIGNATURE_HEADER, proof(true))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(retry.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_download_with_malformed_envelope_is_402() {
        let app = build_router(test_state(MESSY_OUTPUT));
        app.clone()
            .oneshot(post_json("/api/downloads/abc", stored_payload()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/downloads/abc")
                    .header(PAYMENT_SIGNATURE_HEADER, "%%% not base64 %%%")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[tokio::test]
    async fn test_settled_download_delivers_once() {
        let app = build_router(test_state(MESSY_OUTPUT));
        app.clone()
            .oneshot(post_json("/api/downloads/abc", stored_payload()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/downloads/abc")
                    .header(PAYMENT_SIGNATURE_HEADER, proof(true))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/zip"
        );
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("abc-skill.zip"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // Zip local file header magic.
        assert_eq!(&bytes[..2], &b"PK"[..]);

        // Same id again, same valid-looking proof: the entry is gone.
        let second = app
            .clone()
            .oneshot(
                Request::get("/api/downloads/abc")
                    .header(PAYMENT_SIGNATURE_HEADER, proof(true))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_prepare_download_mints_fresh_ids() {
        let app = build_router(test_state(MESSY_OUTPUT));

        let mut ids = Vec::new();
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_json("/api/downloads", stored_payload()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["stored"], true);
            ids.push(body["skillId"].as_str().unwrap().to_string());
        }
        assert_ne!(ids[0], ids[1]);

        // Each minted id gates a live entry.
        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/api/downloads/{}", ids[0]))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[tokio::test]
    async fn test_unknown_id_is_404_even_with_proof() {
        let app = build_router(test_state(MESSY_OUTPUT));
        let response = app
            .oneshot(
                Request::get("/api/downloads/nope")
                    .header(PAYMENT_SIGNATURE_HEADER, proof(true))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

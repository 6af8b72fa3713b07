//! Focused unit tests for Gemini adapter internals.

#![cfg(test)]

use std::sync::Arc;

use crate::{
    Credential, ProviderError, ProviderErrorKind, ProviderFuture, StopReason, TokenUsage, Turn,
};

use super::gateway::GeminiGateway;
use super::serde_api::{
    GeminiApiResponse, build_api_request, extract_error, map_api_response, parse_finish_reason,
};
use super::transport::GeminiTransport;
use super::types::{GeminiContent, GeminiFinishReason, GeminiRequest, GeminiResponse, GeminiRole};

#[derive(Debug)]
struct NoopTransport;

impl GeminiTransport for NoopTransport {
    fn generate<'a>(
        &'a self,
        _request: GeminiRequest,
        _credential: &'a Credential,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>> {
        Box::pin(async { Err(ProviderError::other("not used")) })
    }
}

fn gateway() -> GeminiGateway {
    GeminiGateway::new(Arc::new(NoopTransport))
}

#[test]
fn build_request_moves_system_turns_into_system_instruction() {
    let transcript = vec![
        Turn::system("Respond in es."),
        Turn::user("Hello"),
        Turn::model("Hi!"),
    ];

    let built = gateway().build_request(transcript, "Hola".to_string());
    assert_eq!(built.system_instruction, vec!["Respond in es.".to_string()]);
    assert_eq!(built.contents.len(), 3);
    assert_eq!(built.contents[1].role, GeminiRole::Model);
    assert_eq!(built.contents[2], GeminiContent::user("Hola"));
    assert_eq!(built.model, "gemini-1.5-flash");
}

#[test]
fn build_request_does_not_duplicate_trailing_user_message() {
    let transcript = vec![Turn::user("Hello"), Turn::model("Hi!"), Turn::user("Question")];

    let built = gateway()
        .with_model("gemini-2.0-flash")
        .build_request(transcript, "Question".to_string());
    assert_eq!(built.contents.len(), 3);
    assert_eq!(built.model, "gemini-2.0-flash");
}

#[test]
fn parse_finish_reason_maps_expected_values() {
    assert_eq!(parse_finish_reason(Some("STOP")), GeminiFinishReason::Stop);
    assert_eq!(
        parse_finish_reason(Some("MAX_TOKENS")),
        GeminiFinishReason::MaxTokens
    );
    assert_eq!(parse_finish_reason(Some("SAFETY")), GeminiFinishReason::Safety);
    assert_eq!(parse_finish_reason(Some("unknown")), GeminiFinishReason::Other);
    assert_eq!(parse_finish_reason(None), GeminiFinishReason::Other);
}

#[test]
fn build_api_request_serializes_camel_case_system_instruction() {
    let request = GeminiRequest {
        model: "gemini-1.5-flash".to_string(),
        system_instruction: vec!["Respond in fr.".to_string()],
        contents: vec![GeminiContent::user("Bonjour")],
    };

    let api_request = build_api_request(request).expect("request should build");
    let json = serde_json::to_value(&api_request).expect("request should serialize");

    assert_eq!(json["contents"][0]["role"], "user");
    assert_eq!(json["contents"][0]["parts"][0]["text"], "Bonjour");
    assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Respond in fr.");
}

#[test]
fn build_api_request_rejects_empty_contents_and_blank_user_text() {
    let empty = GeminiRequest {
        model: "gemini-1.5-flash".to_string(),
        system_instruction: Vec::new(),
        contents: Vec::new(),
    };
    let error = build_api_request(empty).expect_err("empty contents should fail");
    assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);

    let blank = GeminiRequest {
        model: "gemini-1.5-flash".to_string(),
        system_instruction: Vec::new(),
        contents: vec![GeminiContent::user("  ")],
    };
    assert!(build_api_request(blank).is_err());
}

#[test]
fn map_api_response_joins_text_parts_and_reads_usage() {
    let body = r#"{
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "A mortgage "}, {"text": "is a loan."}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17},
        "modelVersion": "gemini-1.5-flash-002"
    }"#;
    let parsed: GeminiApiResponse = serde_json::from_str(body).expect("body should parse");

    let response = map_api_response(parsed, "gemini-1.5-flash".to_string());
    assert_eq!(response.text.as_deref(), Some("A mortgage is a loan."));
    assert_eq!(response.finish_reason, GeminiFinishReason::Stop);
    assert_eq!(response.usage.total_tokens, 17);
    assert_eq!(response.model, "gemini-1.5-flash-002");
}

#[test]
fn map_api_response_without_candidates_yields_fallback_reply() {
    let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
    let parsed: GeminiApiResponse = serde_json::from_str(body).expect("body should parse");

    let response = map_api_response(parsed, "gemini-1.5-flash".to_string());
    assert_eq!(response.text, None);
    assert_eq!(response.model, "gemini-1.5-flash");
    assert_eq!(response.finish_reason, GeminiFinishReason::Safety);

    let reply = response.into_reply();
    assert!(reply.is_fallback());
    assert_eq!(reply.stop_reason, StopReason::Safety);
}

#[test]
fn into_reply_carries_model_finish_reason_and_usage() {
    let body = r#"{
        "candidates": [{"finishReason": "SAFETY"}],
        "usageMetadata": {"promptTokenCount": 9, "totalTokenCount": 9},
        "modelVersion": "gemini-1.5-flash-002"
    }"#;
    let parsed: GeminiApiResponse = serde_json::from_str(body).expect("body should parse");

    let reply = map_api_response(parsed, "gemini-1.5-flash".to_string()).into_reply();
    assert!(reply.is_fallback());
    assert_eq!(reply.stop_reason, StopReason::Safety);
    assert_eq!(reply.model.as_deref(), Some("gemini-1.5-flash-002"));
    assert_eq!(
        reply.usage,
        TokenUsage {
            input_tokens: 9,
            output_tokens: 0,
            total_tokens: 9,
        }
    );
}

#[test]
fn extract_error_reads_status_and_message() {
    let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;
    let error = extract_error(body).expect("error should parse");

    assert_eq!(error.code, Some(429));
    assert_eq!(error.message, "Resource has been exhausted");
    assert_eq!(error.status.as_deref(), Some("RESOURCE_EXHAUSTED"));
    assert!(extract_error("not json").is_none());
}

//! Gemini HTTP payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};

use crate::ProviderError;

use super::types::{GeminiFinishReason, GeminiRequest, GeminiResponse, GeminiRole, GeminiUsage};

pub(crate) fn build_api_request(request: GeminiRequest) -> Result<GeminiApiRequest, ProviderError> {
    let contents = request
        .contents
        .into_iter()
        .map(|content| {
            if content.text.trim().is_empty() && content.role == GeminiRole::User {
                return Err(ProviderError::invalid_request(
                    "Gemini user content must not be empty",
                ));
            }

            Ok(GeminiApiContent {
                role: content.role.as_str().to_string(),
                parts: vec![GeminiApiPart { text: content.text }],
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if contents.is_empty() {
        return Err(ProviderError::invalid_request(
            "Gemini request requires at least one content entry",
        ));
    }

    let system_instruction = if request.system_instruction.is_empty() {
        None
    } else {
        Some(GeminiApiSystemInstruction {
            parts: request
                .system_instruction
                .into_iter()
                .map(|text| GeminiApiPart { text })
                .collect(),
        })
    };

    Ok(GeminiApiRequest {
        contents,
        system_instruction,
    })
}

pub(crate) fn parse_finish_reason(value: Option<&str>) -> GeminiFinishReason {
    match value {
        Some("STOP") => GeminiFinishReason::Stop,
        Some("MAX_TOKENS") => GeminiFinishReason::MaxTokens,
        Some("SAFETY") => GeminiFinishReason::Safety,
        Some("RECITATION") => GeminiFinishReason::Recitation,
        _ => GeminiFinishReason::Other,
    }
}

pub(crate) fn extract_error(body: &str) -> Option<GeminiApiError> {
    serde_json::from_str::<GeminiApiErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error)
}

pub(crate) fn map_api_response(value: GeminiApiResponse, requested_model: String) -> GeminiResponse {
    let candidate = value.candidates.unwrap_or_default().into_iter().next();
    let prompt_blocked = value
        .prompt_feedback
        .is_some_and(|feedback| feedback.block_reason.is_some());
    // A blocked prompt comes back with no candidates at all.
    let finish_reason = match candidate.as_ref() {
        None if prompt_blocked => GeminiFinishReason::Safety,
        candidate => {
            parse_finish_reason(candidate.and_then(|candidate| candidate.finish_reason.as_deref()))
        }
    };

    let text = candidate
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .map(|parts| {
            parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.is_empty());

    let usage = value
        .usage_metadata
        .map(|usage| GeminiUsage {
            prompt_tokens: usage.prompt_token_count.unwrap_or(0),
            candidate_tokens: usage.candidates_token_count.unwrap_or(0),
            total_tokens: usage.total_token_count.unwrap_or(0),
        })
        .unwrap_or_default();

    GeminiResponse {
        model: value.model_version.unwrap_or(requested_model),
        text,
        finish_reason,
        usage,
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiErrorEnvelope {
    pub error: GeminiApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiError {
    pub code: Option<u16>,
    pub message: String,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiRequest {
    pub contents: Vec<GeminiApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiApiSystemInstruction>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeminiApiContent {
    pub role: String,
    pub parts: Vec<GeminiApiPart>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeminiApiSystemInstruction {
    pub parts: Vec<GeminiApiPart>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeminiApiPart {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiResponse {
    pub candidates: Option<Vec<GeminiApiCandidate>>,
    pub usage_metadata: Option<GeminiApiUsage>,
    pub model_version: Option<String>,
    pub prompt_feedback: Option<GeminiApiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiPromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiCandidate {
    pub content: Option<GeminiApiCandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiCandidateContent {
    pub parts: Option<Vec<GeminiApiResponsePart>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiUsage {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

//! Gemini adapter types and provider-agnostic conversion logic.

use crate::{Reply, Role, StopReason, TokenUsage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiRequest {
    pub model: String,
    pub system_instruction: Vec<String>,
    pub contents: Vec<GeminiContent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiContent {
    pub role: GeminiRole,
    pub text: String,
}

impl GeminiContent {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: GeminiRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: GeminiRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiRole {
    User,
    Model,
}

impl GeminiRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }

    /// System turns have no content role; they travel as the system instruction.
    pub(crate) fn from_role(role: Role) -> Option<Self> {
        match role {
            Role::User => Some(Self::User),
            Role::Model => Some(Self::Model),
            Role::System => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiFinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other,
}

impl GeminiFinishReason {
    fn stop_reason(self) -> StopReason {
        match self {
            Self::Stop => StopReason::EndTurn,
            Self::MaxTokens => StopReason::MaxTokens,
            Self::Safety => StopReason::Safety,
            Self::Recitation => StopReason::Recitation,
            Self::Other => StopReason::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeminiUsage {
    pub prompt_tokens: u32,
    pub candidate_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiResponse {
    pub model: String,
    pub text: Option<String>,
    pub finish_reason: GeminiFinishReason,
    pub usage: GeminiUsage,
}

impl GeminiResponse {
    pub(crate) fn into_reply(self) -> Reply {
        Reply::from_text(self.text)
            .with_model(self.model)
            .with_stop_reason(self.finish_reason.stop_reason())
            .with_usage(TokenUsage {
                input_tokens: self.usage.prompt_tokens,
                output_tokens: self.usage.candidate_tokens,
                total_tokens: self.usage.total_tokens,
            })
    }
}

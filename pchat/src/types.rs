//! Chat turn request, result, and policy types.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use pcommon::TraceId;
use pprovider::{StopReason, TokenUsage};

use crate::LanguageTag;

/// Appended to every accepted question before it is classified or stored.
pub const RESPONSE_FORMAT_SUFFIX: &str =
    " Please respond in no more than 200 words. Output in sentences.";

pub fn augment_question(question: &str) -> String {
    format!("{question}{RESPONSE_FORMAT_SUFFIX}")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatTurnRequest {
    pub question: Option<String>,
    pub trace_id: Option<TraceId>,
}

impl ChatTurnRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self::from_optional(Some(question.into()))
    }

    /// A request whose payload carried no question at all.
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn from_optional(question: Option<String>) -> Self {
        Self {
            question,
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurnResult {
    pub response: String,
    pub language: LanguageTag,
    pub attempts: u32,
    pub credential_index: usize,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

/// How language directives accumulate at the head of the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectivePolicy {
    /// Prepend a directive for every non-English question.
    Accumulate,
    /// Skip the prepend when the head already carries the same directive.
    #[default]
    OncePerLanguageChange,
}

impl DirectivePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accumulate => "accumulate",
            Self::OncePerLanguageChange => "once_per_language_change",
        }
    }
}

impl Display for DirectivePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DirectivePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "accumulate" => Ok(Self::Accumulate),
            "once_per_language_change" | "once" => Ok(Self::OncePerLanguageChange),
            other => Err(format!("unknown directive policy '{other}'")),
        }
    }
}

/// Phases a single turn moves through, used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    Received,
    Prepared,
    Dispatched,
    Succeeded,
    Failed,
}

impl ChatPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Prepared => "prepared",
            Self::Dispatched => "dispatched",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

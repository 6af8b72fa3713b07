//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use pprovider::{ProviderError, RotationFailure};

pub const QUESTION_REQUIRED: &str = "Question is required";
pub const MODEL_COMMUNICATION_FAILED: &str = "Failed to communicate with the model.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    /// Missing or blank question; caller error, never retried.
    InvalidInput,
    /// Every permitted attempt was rate limited.
    RateLimitExhausted,
    /// Upstream failure that is not a rate limit; never retried.
    Provider,
    Store,
}

/// A failed chat turn.
///
/// `message` is safe to show to callers. `detail` keeps the raw upstream
/// description for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidInput, message)
    }

    pub fn question_required() -> Self {
        Self::invalid_input(QUESTION_REQUIRED)
    }

    pub fn rate_limit_exhausted(detail: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::RateLimitExhausted, MODEL_COMMUNICATION_FAILED).with_detail(detail)
    }

    pub fn provider(detail: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, MODEL_COMMUNICATION_FAILED).with_detail(detail)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Store, message)
    }

    pub fn is_client_error(&self) -> bool {
        self.kind == ChatErrorKind::InvalidInput
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{:?}: {} ({detail})", self.kind, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        ChatError::provider(value.to_string())
    }
}

impl From<RotationFailure> for ChatError {
    fn from(value: RotationFailure) -> Self {
        match value {
            RotationFailure::Exhausted { .. } => ChatError::rate_limit_exhausted(value.to_string()),
            RotationFailure::Provider { error, .. } => ChatError::from(error),
        }
    }
}

//! Conversational turn orchestration with language directives and credential failover.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pchat::prelude::*;
//!
//! # async fn run(gateway: Arc<dyn ModelGateway>) -> Result<(), Box<dyn std::error::Error>> {
//! let pool = Arc::new(CredentialPool::new(["key-a", "key-b"])?);
//! let orchestrator = ChatOrchestrator::new(gateway, pool);
//!
//! let result = orchestrator
//!     .handle(ChatTurnRequest::new("What are closing costs?"))
//!     .await?;
//! println!("{}", result.response);
//! # Ok(())
//! # }
//! ```

mod error;
mod language;
mod orchestrator;
mod store;
mod types;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, ChatOrchestrator, ChatOrchestratorBuilder, ChatPolicy,
        ChatTurnRequest, ChatTurnResult, ConversationStore, DirectivePolicy,
        InMemoryConversationStore, LanguageAdvisor, LanguageClassifier, LanguageTag,
        WhatlangClassifier,
    };
    pub use pcommon::TraceId;
    pub use pprovider::{CredentialPool, ModelGateway, RotationPolicy, Turn};
}

pub use error::{ChatError, ChatErrorKind, MODEL_COMMUNICATION_FAILED, QUESTION_REQUIRED};
pub use language::{
    ClassifierError, ClassifierErrorKind, DEFAULT_CANDIDATE_LANGUAGES, DEFAULT_MIN_CONFIDENCE,
    LanguageAdvisor, LanguageClassifier, LanguageTag, WhatlangClassifier,
};
pub use orchestrator::{ChatOrchestrator, ChatOrchestratorBuilder, ChatPolicy};
pub use store::{
    ChatFuture, ConversationStore, InMemoryConversationStore, PERSONA_MODEL_SEED,
    PERSONA_USER_SEED, default_persona,
};
pub use types::{
    ChatPhase, ChatTurnRequest, ChatTurnResult, DirectivePolicy, RESPONSE_FORMAT_SUFFIX,
    augment_question,
};
pub use pcommon::TraceId;

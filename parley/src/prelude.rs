//! Common imports for embedding the parley gateway.

pub use crate::{
    ApiError, AppState, ChatError, ChatErrorKind, ChatOrchestrator, ChatOrchestratorBuilder,
    ChatTurnRequest, ChatTurnResult, ConversationStore, CredentialPool, DirectivePolicy,
    InMemoryConversationStore, LanguageAdvisor, ModelGateway, ParleyConfig, ProviderError, Reply,
    RotationPolicy, RuntimeError, Turn, build_state, create_router,
};

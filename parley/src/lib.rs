//! Facade and service crate for the parley conversational gateway.
//!
//! Re-exports the workspace crates and provides configuration, CLI parsing,
//! runtime wiring, and the axum HTTP surface used by the `parley` binary.
//!
//! ```rust,no_run
//! use parley::{ParleyConfig, build_state, create_router};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ParleyConfig::default();
//! let state = build_state(&config, vec!["key-a".to_string()])?;
//! let router = create_router(state, &config.server.cors_origins);
//!
//! let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
//! parley::api::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod prelude;
pub mod runtime;

pub use pchat;
pub use pcommon;
pub use pobserve;
pub use pprovider;

pub use api::{ApiError, AppState, ChatResponse, HealthResponse, create_router};
pub use cli::CliArgs;
pub use config::{ConfigError, ParleyConfig};
pub use pchat::{
    ChatError, ChatErrorKind, ChatOrchestrator, ChatOrchestratorBuilder, ChatTurnRequest,
    ChatTurnResult, ConversationStore, DirectivePolicy, InMemoryConversationStore,
    LanguageAdvisor,
};
pub use pcommon::{BoxFuture, TraceId};
pub use pprovider::{
    CredentialPool, ModelGateway, ProviderError, Reply, RotationPolicy, Turn,
};
pub use runtime::{RuntimeError, build_state, credentials_from_env};

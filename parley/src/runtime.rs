//! Runtime wiring: credentials, HTTP client, gateway, hooks, and orchestrator.

use std::sync::Arc;

use pchat::{ChatOrchestrator, ChatOrchestratorBuilder, InMemoryConversationStore};
use pobserve::{
    CompositeProviderHooks, MetricsObservabilityHooks, SafeProviderHooks,
    TracingObservabilityHooks,
};
use pprovider::adapters::gemini::{GeminiGateway, GeminiHttpTransport};
use pprovider::{CredentialPool, ModelGateway, ProviderError, ProviderOperationHooks};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::{ConfigError, ParleyConfig};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no credentials found; set {prefix}_1 (and optionally {prefix}_2, ...)")]
    MissingCredentials { prefix: String },
    #[error("credential pool rejected: {0}")]
    Credentials(#[from] ProviderError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Collects `<prefix>_1`, `<prefix>_2`, ... until the first unset index.
///
/// Blank values are skipped without ending the scan.
pub fn credentials_from_lookup<F>(prefix: &str, lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut credentials = Vec::new();
    for index in 1.. {
        let name = format!("{prefix}_{index}");
        match lookup(&name) {
            None => break,
            Some(value) if value.trim().is_empty() => {
                tracing::warn!(variable = %name, "skipping blank credential");
            }
            Some(value) => credentials.push(value),
        }
    }
    credentials
}

pub fn credentials_from_env(prefix: &str) -> Vec<String> {
    credentials_from_lookup(prefix, |name| std::env::var(name).ok())
}

pub fn credential_pool(
    prefix: &str,
    credentials: Vec<String>,
) -> Result<CredentialPool, RuntimeError> {
    if credentials.is_empty() {
        return Err(RuntimeError::MissingCredentials {
            prefix: prefix.to_string(),
        });
    }
    Ok(CredentialPool::new(credentials)?)
}

pub fn gemini_gateway(config: &ParleyConfig) -> Result<GeminiGateway, RuntimeError> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()?;
    let transport =
        GeminiHttpTransport::new(client).with_base_url(config.provider.base_url.clone());

    Ok(GeminiGateway::new(Arc::new(transport)).with_model(config.provider.model.clone()))
}

/// Tracing and metrics hooks, each isolated from the other's panics.
pub fn default_hooks() -> Arc<dyn ProviderOperationHooks> {
    Arc::new(
        CompositeProviderHooks::new()
            .with(SafeProviderHooks::new(TracingObservabilityHooks))
            .with(SafeProviderHooks::new(MetricsObservabilityHooks)),
    )
}

pub fn orchestrator_builder(
    config: &ParleyConfig,
    gateway: Arc<dyn ModelGateway>,
    pool: Arc<CredentialPool>,
) -> Result<ChatOrchestratorBuilder, RuntimeError> {
    Ok(ChatOrchestrator::builder(gateway, pool)
        .store(Arc::new(InMemoryConversationStore::with_seed(
            config.persona_turns(),
        )))
        .hooks(default_hooks())
        .rotation_policy(config.rotation_policy())
        .directive_policy(config.directive_policy()?))
}

pub fn build_state(
    config: &ParleyConfig,
    credentials: Vec<String>,
) -> Result<AppState, RuntimeError> {
    let pool = Arc::new(credential_pool(
        &config.provider.credential_env_prefix,
        credentials,
    )?);
    let gateway = Arc::new(gemini_gateway(config)?);
    let orchestrator = orchestrator_builder(config, gateway, pool)?.build();

    Ok(AppState::new(orchestrator))
}

/// `RUST_LOG` wins over the configured level.
pub fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

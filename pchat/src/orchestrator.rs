//! Turn orchestration: validate, record, dispatch with credential failover, record.

use std::sync::Arc;

use pprovider::{
    CredentialPool, ModelGateway, NoopOperationHooks, ProviderOperationHooks, RotationPolicy,
    Turn, execute_with_rotation,
};
use tokio::sync::Mutex;

use crate::{
    ChatError, ChatPhase, ChatTurnRequest, ChatTurnResult, ConversationStore, DirectivePolicy,
    InMemoryConversationStore, LanguageAdvisor, LanguageTag, augment_question,
};

const SEND_OPERATION: &str = "send";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatPolicy {
    pub rotation: RotationPolicy,
    pub directive: DirectivePolicy,
}

/// Runs chat turns against one shared transcript.
///
/// Turns are serialized: the lock is held from the first transcript write
/// until the model reply is recorded, retry pauses included.
#[derive(Clone)]
pub struct ChatOrchestrator {
    gateway: Arc<dyn ModelGateway>,
    pool: Arc<CredentialPool>,
    store: Arc<dyn ConversationStore>,
    advisor: LanguageAdvisor,
    hooks: Arc<dyn ProviderOperationHooks>,
    policy: ChatPolicy,
    turn_lock: Arc<Mutex<()>>,
}

impl ChatOrchestrator {
    pub fn new(gateway: Arc<dyn ModelGateway>, pool: Arc<CredentialPool>) -> Self {
        Self::builder(gateway, pool).build()
    }

    pub fn builder(
        gateway: Arc<dyn ModelGateway>,
        pool: Arc<CredentialPool>,
    ) -> ChatOrchestratorBuilder {
        ChatOrchestratorBuilder::new(gateway, pool)
    }

    pub fn policy(&self) -> &ChatPolicy {
        &self.policy
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    pub fn active_credential_index(&self) -> usize {
        self.pool.current_index()
    }

    pub async fn transcript(&self) -> Result<Vec<Turn>, ChatError> {
        self.store.snapshot().await
    }

    pub async fn handle(&self, request: ChatTurnRequest) -> Result<ChatTurnResult, ChatError> {
        let trace_id = request
            .trace_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        let question = match request.question {
            Some(question) if !question.trim().is_empty() => question,
            _ => {
                tracing::info!(
                    trace_id = %trace_id,
                    phase = ChatPhase::Failed.as_str(),
                    "rejected chat turn without a question"
                );
                return Err(ChatError::question_required());
            }
        };
        tracing::debug!(trace_id = %trace_id, phase = ChatPhase::Received.as_str(), "chat turn received");

        let _turn = self.turn_lock.lock().await;

        let message = augment_question(&question);
        let language = self.advisor.detect(&message);
        if !language.is_english() {
            self.apply_directive(&language).await?;
        }
        self.store.append(Turn::user(message.clone())).await?;

        let transcript = self.store.snapshot().await?;
        tracing::debug!(
            trace_id = %trace_id,
            phase = ChatPhase::Prepared.as_str(),
            language = %language,
            turns = transcript.len(),
            "chat turn prepared"
        );

        let gateway = self.gateway.as_ref();
        let dispatched = execute_with_rotation(
            gateway.id(),
            SEND_OPERATION,
            &self.pool,
            &self.policy.rotation,
            self.hooks.as_ref(),
            |credential, attempt| {
                tracing::debug!(
                    trace_id = %trace_id,
                    phase = ChatPhase::Dispatched.as_str(),
                    attempt,
                    credential_index = credential.index(),
                    "dispatching chat turn"
                );
                let transcript = transcript.clone();
                let message = message.clone();
                async move { gateway.send(&credential, transcript, message).await }
            },
            tokio::time::sleep,
        )
        .await;

        let outcome = match dispatched {
            Ok(outcome) => outcome,
            Err(failure) => {
                tracing::error!(
                    trace_id = %trace_id,
                    phase = ChatPhase::Failed.as_str(),
                    attempts = failure.attempts(),
                    error = %failure,
                    "chat turn failed"
                );
                return Err(ChatError::from(failure));
            }
        };

        let reply = outcome.value;
        if reply.is_fallback() {
            tracing::warn!(
                trace_id = %trace_id,
                stop_reason = %reply.stop_reason,
                model = reply.model.as_deref().unwrap_or("unknown"),
                "model returned no text; storing fallback reply"
            );
        }
        self.store.append(Turn::model(reply.text.clone())).await?;

        let credential_index = self.pool.current_index();
        tracing::info!(
            trace_id = %trace_id,
            phase = ChatPhase::Succeeded.as_str(),
            attempts = outcome.attempts,
            credential_index,
            language = %language,
            stop_reason = %reply.stop_reason,
            input_tokens = reply.usage.input_tokens,
            output_tokens = reply.usage.output_tokens,
            total_tokens = reply.usage.total_tokens,
            "chat turn completed"
        );

        Ok(ChatTurnResult {
            response: reply.text,
            language,
            attempts: outcome.attempts,
            credential_index,
            stop_reason: reply.stop_reason,
            usage: reply.usage,
        })
    }

    async fn apply_directive(&self, language: &LanguageTag) -> Result<(), ChatError> {
        let directive = Turn::system(format!("Respond in {language}."));

        if self.policy.directive == DirectivePolicy::OncePerLanguageChange
            && self.store.head().await?.as_ref() == Some(&directive)
        {
            return Ok(());
        }

        self.store.prepend_directive(directive).await
    }
}

pub struct ChatOrchestratorBuilder {
    gateway: Arc<dyn ModelGateway>,
    pool: Arc<CredentialPool>,
    store: Option<Arc<dyn ConversationStore>>,
    advisor: Option<LanguageAdvisor>,
    hooks: Option<Arc<dyn ProviderOperationHooks>>,
    policy: ChatPolicy,
}

impl ChatOrchestratorBuilder {
    pub fn new(gateway: Arc<dyn ModelGateway>, pool: Arc<CredentialPool>) -> Self {
        Self {
            gateway,
            pool,
            store: None,
            advisor: None,
            hooks: None,
            policy: ChatPolicy::default(),
        }
    }

    pub fn store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn advisor(mut self, advisor: LanguageAdvisor) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn policy(mut self, policy: ChatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn rotation_policy(mut self, rotation: RotationPolicy) -> Self {
        self.policy.rotation = rotation;
        self
    }

    pub fn directive_policy(mut self, directive: DirectivePolicy) -> Self {
        self.policy.directive = directive;
        self
    }

    pub fn build(self) -> ChatOrchestrator {
        ChatOrchestrator {
            gateway: self.gateway,
            pool: self.pool,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryConversationStore::with_persona())),
            advisor: self.advisor.unwrap_or_default(),
            hooks: self.hooks.unwrap_or_else(|| Arc::new(NoopOperationHooks)),
            policy: self.policy,
            turn_lock: Arc::new(Mutex::new(())),
        }
    }
}

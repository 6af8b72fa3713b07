use std::time::Duration;

use pprovider::{ProviderError, ProviderId, ProviderOperationHooks};

/// Forwards every callback to each registered hook, in registration order.
#[derive(Default)]
pub struct CompositeProviderHooks {
    hooks: Vec<Box<dyn ProviderOperationHooks>>,
}

impl CompositeProviderHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: impl ProviderOperationHooks + 'static) -> Self {
        self.hooks.push(Box::new(hooks));
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl ProviderOperationHooks for CompositeProviderHooks {
    fn on_attempt_start(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        credential_index: usize,
    ) {
        for hooks in &self.hooks {
            hooks.on_attempt_start(provider, operation, attempt, credential_index);
        }
    }

    fn on_credential_rotated(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        from_index: usize,
        to_index: usize,
        delay: Duration,
        error: &ProviderError,
    ) {
        for hooks in &self.hooks {
            hooks.on_credential_rotated(
                provider, operation, attempt, from_index, to_index, delay, error,
            );
        }
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        for hooks in &self.hooks {
            hooks.on_success(provider, operation, attempts);
        }
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        for hooks in &self.hooks {
            hooks.on_failure(provider, operation, attempts, error);
        }
    }

    fn on_retries_exhausted(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        for hooks in &self.hooks {
            hooks.on_retries_exhausted(provider, operation, attempts, error);
        }
    }
}

//! Tracing-based hooks for provider attempts and credential rotation.
//!
//! Events never include credential material, only pool indices.
//!
//! ```rust
//! use pobserve::TracingObservabilityHooks;
//! use pprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! accepts_provider_hooks(&TracingObservabilityHooks);
//! ```

use std::time::Duration;

use pprovider::{ProviderError, ProviderId, ProviderOperationHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        credential_index: usize,
    ) {
        tracing::debug!(
            phase = "provider",
            event = "attempt_start",
            provider = %provider,
            operation,
            attempt,
            credential_index
        );
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
        tracing::warn!(
            phase = "provider",
            event = "credential_rotated",
            provider = %provider,
            operation,
            attempt,
            from_index,
            to_index,
            delay_ms = delay.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            attempts
        );
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            attempts,
            error_kind = ?error.kind,
            http_status = error.http_status,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_retries_exhausted(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "rate_limit_exhausted",
            provider = %provider,
            operation,
            attempts,
            error = %error
        );
    }
}

//! Metrics-based hooks for provider attempts and credential rotation.
//!
//! ```rust
//! use pobserve::MetricsObservabilityHooks;
//! use pprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use pprovider::{ProviderError, ProviderId, ProviderOperationHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempt: u32,
        credential_index: usize,
    ) {
        metrics::counter!(
            "parley_provider_attempt_start_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "credential_index" => credential_index.to_string()
        )
        .increment(1);
    }

    fn on_credential_rotated(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempt: u32,
        _from_index: usize,
        to_index: usize,
        delay: Duration,
        _error: &ProviderError,
    ) {
        metrics::counter!(
            "parley_provider_credential_rotations_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::gauge!(
            "parley_provider_active_credential_index",
            "provider" => provider.to_string()
        )
        .set(to_index as f64);
        metrics::histogram!(
            "parley_provider_retry_delay_seconds",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        metrics::counter!(
            "parley_provider_success_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "parley_provider_attempts_per_success",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempts: u32,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "parley_provider_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind),
            "http_status" => error
                .http_status
                .map_or_else(|| "none".to_string(), |status| status.to_string())
        )
        .increment(1);
    }

    fn on_retries_exhausted(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        _error: &ProviderError,
    ) {
        metrics::counter!(
            "parley_provider_rate_limit_exhausted_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "parley_provider_attempts_per_exhaustion",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }
}

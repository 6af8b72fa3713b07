use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use pprovider::{ProviderError, ProviderId, ProviderOperationHooks};

/// Swallows panics raised by the wrapped hooks so observability can never
/// abort a chat turn.
pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_attempt_start(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        credential_index: usize,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_attempt_start(provider, operation, attempt, credential_index)
        }));
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
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_credential_rotated(
                provider, operation, attempt, from_index, to_index, delay, error,
            )
        }));
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(provider, operation, attempts)
        }));
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(provider, operation, attempts, error)
        }));
    }

    fn on_retries_exhausted(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_retries_exhausted(provider, operation, attempts, error)
        }));
    }
}

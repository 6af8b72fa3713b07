//! Rate-limit detection, credential rotation policy, and operational hook contracts.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::time::Duration;

use crate::{Credential, CredentialPool, ProviderError, ProviderId};

/// Text heuristic that recognises a provider rate-limit failure.
///
/// ```rust
/// use pprovider::{ProviderError, RateLimitSignal};
///
/// assert!(RateLimitSignal::matches(&ProviderError::other("Rate Limit exceeded")));
/// assert!(!RateLimitSignal::matches(&ProviderError::rate_limited("quota exhausted")));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSignal;

impl RateLimitSignal {
    pub const MARKER: &'static str = "rate limit";

    pub fn matches_text(message: &str) -> bool {
        message.to_lowercase().contains(Self::MARKER)
    }

    /// Only the message text is consulted, never the error kind.
    pub fn matches(error: &ProviderError) -> bool {
        Self::matches_text(&error.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotationPolicy {
    /// Upper bound on dispatches per request. `None` means one per credential,
    /// and never fewer than two so a lone credential is retried once.
    pub max_attempts: Option<u32>,
    pub retry_delay: Duration,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl RotationPolicy {
    const MIN_DEFAULT_ATTEMPTS: u32 = 2;

    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
            ..Self::default()
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn attempt_budget(&self, pool_size: usize) -> u32 {
        match self.max_attempts {
            Some(max_attempts) => max_attempts.max(1),
            None => u32::try_from(pool_size)
                .unwrap_or(u32::MAX)
                .max(Self::MIN_DEFAULT_ATTEMPTS),
        }
    }

    pub fn should_rotate(&self, attempt: u32, pool_size: usize, error: &ProviderError) -> bool {
        RateLimitSignal::matches(error) && attempt < self.attempt_budget(pool_size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationOutcome<T> {
    pub value: T,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationFailure {
    /// Every permitted attempt was rate limited.
    Exhausted {
        attempts: u32,
        last_error: ProviderError,
    },
    /// A failure that is not a rate limit; never retried.
    Provider { attempts: u32, error: ProviderError },
}

impl RotationFailure {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } | Self::Provider { attempts, .. } => *attempts,
        }
    }

    pub fn error(&self) -> &ProviderError {
        match self {
            Self::Exhausted { last_error, .. } => last_error,
            Self::Provider { error, .. } => error,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

impl Display for RotationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted {
                attempts,
                last_error,
            } => write!(f, "rate limited after {attempts} attempts: {last_error}"),
            Self::Provider { attempts, error } => {
                write!(f, "provider failure on attempt {attempts}: {error}")
            }
        }
    }
}

impl Error for RotationFailure {}

pub trait ProviderOperationHooks: Send + Sync {
    fn on_attempt_start(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _credential_index: usize,
    ) {
    }

    fn on_credential_rotated(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _from_index: usize,
        _to_index: usize,
        _delay: Duration,
        _error: &ProviderError,
    ) {
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _attempts: u32) {}

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
    }

    fn on_retries_exhausted(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperationHooks;

impl ProviderOperationHooks for NoopOperationHooks {}

/// Runs `execute` with the pool's current credential, rotating and pausing on
/// rate-limit failures until the policy's attempt budget is spent.
pub async fn execute_with_rotation<T, Op, OpFuture, Sleep, SleepFuture>(
    provider: ProviderId,
    operation: &str,
    pool: &CredentialPool,
    policy: &RotationPolicy,
    hooks: &dyn ProviderOperationHooks,
    mut execute: Op,
    mut sleep: Sleep,
) -> Result<RotationOutcome<T>, RotationFailure>
where
    Op: FnMut(Credential, u32) -> OpFuture,
    OpFuture: Future<Output = Result<T, ProviderError>>,
    Sleep: FnMut(Duration) -> SleepFuture,
    SleepFuture: Future<Output = ()>,
{
    let mut attempt = 1;

    loop {
        let credential = pool.current();
        let credential_index = credential.index();
        hooks.on_attempt_start(provider, operation, attempt, credential_index);

        match execute(credential, attempt).await {
            Ok(value) => {
                hooks.on_success(provider, operation, attempt);
                return Ok(RotationOutcome {
                    value,
                    attempts: attempt,
                });
            }
            Err(error) => {
                if !RateLimitSignal::matches(&error) {
                    hooks.on_failure(provider, operation, attempt, &error);
                    return Err(RotationFailure::Provider {
                        attempts: attempt,
                        error,
                    });
                }

                if !policy.should_rotate(attempt, pool.len(), &error) {
                    hooks.on_retries_exhausted(provider, operation, attempt, &error);
                    return Err(RotationFailure::Exhausted {
                        attempts: attempt,
                        last_error: error,
                    });
                }

                pool.rotate_from(credential_index);
                hooks.on_credential_rotated(
                    provider,
                    operation,
                    attempt,
                    credential_index,
                    pool.current_index(),
                    policy.retry_delay,
                    &error,
                );
                sleep(policy.retry_delay).await;
                attempt += 1;
            }
        }
    }
}

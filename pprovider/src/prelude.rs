//! Common `pprovider` imports for downstream crates.

pub use crate::{
    Credential, CredentialPool, ModelGateway, NoopOperationHooks, ProviderError,
    ProviderErrorKind, ProviderFuture, ProviderId, ProviderOperationHooks, RateLimitSignal, Reply,
    Role, RotationFailure, RotationOutcome, RotationPolicy, StopReason, TokenUsage, Turn,
    execute_with_rotation,
};
pub use pcommon::BoxFuture;

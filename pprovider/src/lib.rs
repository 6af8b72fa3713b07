//! Model gateway contracts, credential pool, and rate-limit rotation for parley.
//!
//! ```rust
//! use pprovider::{CredentialPool, ProviderError, RateLimitSignal, RotationPolicy};
//!
//! let pool = CredentialPool::new(["key-a", "key-b"]).expect("pool should build");
//! let policy = RotationPolicy::default();
//! let limited = ProviderError::other("Rate limit exceeded");
//!
//! assert!(RateLimitSignal::matches(&limited));
//! assert!(policy.should_rotate(1, pool.len(), &limited));
//! assert!(!policy.should_rotate(2, pool.len(), &limited));
//! ```

pub mod adapters;
pub mod prelude;

mod credentials;
mod error;
mod gateway;
mod model;
mod resilience;

pub use credentials::{Credential, CredentialPool, SecretString};
pub use error::{ProviderError, ProviderErrorKind};
pub use gateway::{ModelGateway, ProviderFuture};
pub use model::{ProviderId, Reply, Role, StopReason, TokenUsage, Turn};
pub use resilience::{
    NoopOperationHooks, ProviderOperationHooks, RateLimitSignal, RotationFailure,
    RotationOutcome, RotationPolicy, execute_with_rotation,
};

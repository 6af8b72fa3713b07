use pcommon::BoxFuture;

use crate::{Credential, ProviderError, ProviderId, Reply, Turn};

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;

/// One model call bound to one credential.
///
/// Implementations open a fresh session per call: nothing from a previous call
/// is reused. `transcript` is the full prior context and `message` the newest
/// user turn. Failures carry the provider's raw description; classifying them
/// is left to the caller.
pub trait ModelGateway: Send + Sync {
    fn id(&self) -> ProviderId;

    fn send<'a>(
        &'a self,
        credential: &'a Credential,
        transcript: Vec<Turn>,
        message: String,
    ) -> ProviderFuture<'a, Result<Reply, ProviderError>>;
}

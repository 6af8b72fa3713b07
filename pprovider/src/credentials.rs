//! Secret handling and the ordered, rotating credential pool.
//!
//! ```rust
//! use pprovider::CredentialPool;
//!
//! let pool = CredentialPool::new(["key-a", "key-b"]).expect("pool should build");
//! assert_eq!(pool.current().expose(), "key-a");
//!
//! pool.rotate();
//! assert_eq!(pool.current().expose(), "key-b");
//!
//! pool.rotate();
//! assert_eq!(pool.current_index(), 0);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::ProviderError;

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8 and the string is not read again.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// An opaque provider token together with its position in the pool.
#[derive(Clone)]
pub struct Credential {
    index: usize,
    secret: Arc<SecretString>,
}

impl Credential {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn expose(&self) -> &str {
        self.secret.expose()
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.secret == other.secret
    }
}

impl Eq for Credential {}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("index", &self.index)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Fixed, non-empty, ordered set of credentials with a shared cyclic cursor.
pub struct CredentialPool {
    credentials: Vec<Credential>,
    cursor: AtomicUsize,
    rotations: AtomicU64,
}

impl CredentialPool {
    pub fn new<I, S>(credentials: I) -> Result<Self, ProviderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pool = Vec::new();
        for (index, value) in credentials.into_iter().enumerate() {
            let secret = SecretString::new(value);
            if secret.is_empty() {
                return Err(ProviderError::authentication(format!(
                    "credential {} must not be empty",
                    index + 1
                )));
            }

            pool.push(Credential {
                index,
                secret: Arc::new(secret),
            });
        }

        if pool.is_empty() {
            return Err(ProviderError::authentication(
                "credential pool requires at least one credential",
            ));
        }

        Ok(Self {
            credentials: pool,
            cursor: AtomicUsize::new(0),
            rotations: AtomicU64::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub fn current(&self) -> Credential {
        self.credentials[self.current_index() % self.len()].clone()
    }

    /// Advances the cursor by one position, wrapping at the end of the pool.
    pub fn rotate(&self) {
        let len = self.len();
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |index| {
                Some((index + 1) % len)
            });
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    /// Advances the cursor only if it still points at `observed`.
    ///
    /// Returns `false` when another caller already rotated away from `observed`.
    pub fn rotate_from(&self, observed: usize) -> bool {
        let next = (observed + 1) % self.len();
        let advanced = self
            .cursor
            .compare_exchange(observed, next, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();

        if advanced {
            self.rotations.fetch_add(1, Ordering::Relaxed);
        }

        advanced
    }

    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPool")
            .field("len", &self.len())
            .field("current_index", &self.current_index())
            .field("rotations", &self.rotations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::CredentialPool;
    use crate::ProviderErrorKind;

    #[test]
    fn empty_pool_is_rejected() {
        let error = CredentialPool::new(Vec::<String>::new()).expect_err("empty pool should fail");
        assert_eq!(error.kind, ProviderErrorKind::Authentication);
    }

    #[test]
    fn blank_credential_is_rejected() {
        let error = CredentialPool::new(["key-a", "  "]).expect_err("blank key should fail");
        assert_eq!(error.kind, ProviderErrorKind::Authentication);
        assert!(error.message.contains("credential 2"));
    }

    #[test]
    fn rotate_cycles_through_pool_in_order() {
        let pool = CredentialPool::new(["a", "b", "c"]).expect("pool should build");
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(pool.current().expose().to_string());
            pool.rotate();
        }

        assert_eq!(seen, vec!["a", "b", "c", "a"]);
        assert_eq!(pool.rotations(), 4);
    }

    #[test]
    fn single_credential_rotation_returns_same_credential() {
        let pool = CredentialPool::new(["only"]).expect("pool should build");
        pool.rotate();
        assert!(pool.rotate_from(0));

        assert_eq!(pool.current().expose(), "only");
        assert_eq!(pool.current_index(), 0);
        assert_eq!(pool.rotations(), 2);
    }

    #[test]
    fn rotate_from_stale_index_does_not_double_rotate() {
        let pool = CredentialPool::new(["a", "b", "c"]).expect("pool should build");

        assert!(pool.rotate_from(0));
        assert!(!pool.rotate_from(0));
        assert_eq!(pool.current().expose(), "b");
        assert_eq!(pool.rotations(), 1);
    }

    #[test]
    fn concurrent_rotations_from_same_index_advance_once() {
        let pool = Arc::new(CredentialPool::new(["a", "b", "c"]).expect("pool should build"));
        let handles = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || pool.rotate_from(0))
            })
            .collect::<Vec<_>>();

        let advanced = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread should join"))
            .filter(|advanced| *advanced)
            .count();

        assert_eq!(advanced, 1);
        assert_eq!(pool.current_index(), 1);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let pool = CredentialPool::new(["sk-very-secret"]).expect("pool should build");
        let rendered = format!("{:?} {:?}", pool, pool.current());

        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}

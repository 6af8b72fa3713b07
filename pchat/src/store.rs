//! Conversation storage contracts and the process-wide in-memory transcript.

use std::sync::Mutex;

use pcommon::BoxFuture;
use pprovider::Turn;

use crate::ChatError;

pub type ChatFuture<'a, T> = BoxFuture<'a, T>;

pub const PERSONA_USER_SEED: &str =
    "Hello, you are a chatbot designed to help users with real-estate related questions.";
pub const PERSONA_MODEL_SEED: &str = "Hello! How can I help you with real estate?";

/// The opening exchange every fresh transcript starts with.
pub fn default_persona() -> Vec<Turn> {
    vec![
        Turn::user(PERSONA_USER_SEED),
        Turn::model(PERSONA_MODEL_SEED),
    ]
}

/// Ordered, shared conversation transcript.
///
/// Implementations must keep insertion order. `prepend_directive` is the only
/// operation allowed to write anywhere but the tail.
pub trait ConversationStore: Send + Sync {
    fn append<'a>(&'a self, turn: Turn) -> ChatFuture<'a, Result<(), ChatError>>;

    fn prepend_directive<'a>(&'a self, turn: Turn) -> ChatFuture<'a, Result<(), ChatError>>;

    fn snapshot<'a>(&'a self) -> ChatFuture<'a, Result<Vec<Turn>, ChatError>>;

    fn len<'a>(&'a self) -> ChatFuture<'a, Result<usize, ChatError>>;

    fn head<'a>(&'a self) -> ChatFuture<'a, Result<Option<Turn>, ChatError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    turns: Mutex<Vec<Turn>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: Vec<Turn>) -> Self {
        Self {
            turns: Mutex::new(seed),
        }
    }

    pub fn with_persona() -> Self {
        Self::with_seed(default_persona())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Turn>>, ChatError> {
        self.turns
            .lock()
            .map_err(|_| ChatError::store("conversation store lock poisoned"))
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn append<'a>(&'a self, turn: Turn) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            self.lock()?.push(turn);
            Ok(())
        })
    }

    fn prepend_directive<'a>(&'a self, turn: Turn) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            self.lock()?.insert(0, turn);
            Ok(())
        })
    }

    fn snapshot<'a>(&'a self) -> ChatFuture<'a, Result<Vec<Turn>, ChatError>> {
        Box::pin(async move { Ok(self.lock()?.clone()) })
    }

    fn len<'a>(&'a self) -> ChatFuture<'a, Result<usize, ChatError>> {
        Box::pin(async move { Ok(self.lock()?.len()) })
    }

    fn head<'a>(&'a self) -> ChatFuture<'a, Result<Option<Turn>, ChatError>> {
        Box::pin(async move { Ok(self.lock()?.first().cloned()) })
    }
}

mod gateway;
mod serde_api;
mod tests;
mod transport;
mod types;

pub use gateway::{DEFAULT_GEMINI_MODEL, GeminiGateway};
pub use transport::{GEMINI_BASE_URL, GeminiHttpTransport, GeminiTransport};
pub use types::{
    GeminiContent, GeminiFinishReason, GeminiRequest, GeminiResponse, GeminiRole, GeminiUsage,
};

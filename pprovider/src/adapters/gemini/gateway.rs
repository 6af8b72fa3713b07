//! Gemini gateway implementation over transport and shared models.

use std::sync::Arc;

use reqwest::Client;

use crate::{
    Credential, ModelGateway, ProviderError, ProviderFuture, ProviderId, Reply, Turn,
};

use super::transport::{GeminiHttpTransport, GeminiTransport};
use super::types::{GeminiContent, GeminiRequest, GeminiRole};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Clone)]
pub struct GeminiGateway {
    transport: Arc<dyn GeminiTransport>,
    model: String,
}

impl GeminiGateway {
    pub fn new(transport: Arc<dyn GeminiTransport>) -> Self {
        Self {
            transport,
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn default_http_transport(client: Client) -> GeminiHttpTransport {
        GeminiHttpTransport::new(client)
    }

    pub(crate) fn build_request(&self, transcript: Vec<Turn>, message: String) -> GeminiRequest {
        let mut system_instruction = Vec::new();
        let mut contents = Vec::with_capacity(transcript.len() + 1);

        for turn in transcript {
            match GeminiRole::from_role(turn.role) {
                Some(GeminiRole::User) => contents.push(GeminiContent::user(turn.content)),
                Some(GeminiRole::Model) => contents.push(GeminiContent::model(turn.content)),
                None => system_instruction.push(turn.content),
            }
        }

        // The caller usually records the message in the transcript before sending.
        let already_last = contents
            .last()
            .is_some_and(|content| content.role == GeminiRole::User && content.text == message);
        if !already_last {
            contents.push(GeminiContent::user(message));
        }

        GeminiRequest {
            model: self.model.clone(),
            system_instruction,
            contents,
        }
    }
}

impl ModelGateway for GeminiGateway {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn send<'a>(
        &'a self,
        credential: &'a Credential,
        transcript: Vec<Turn>,
        message: String,
    ) -> ProviderFuture<'a, Result<Reply, ProviderError>> {
        Box::pin(async move {
            if message.trim().is_empty() {
                return Err(ProviderError::invalid_request("message must not be empty"));
            }

            let request = self.build_request(transcript, message);
            let response = self.transport.generate(request, credential).await?;
            Ok(response.into_reply())
        })
    }
}

//! Gemini transport trait and reqwest-based HTTP implementation.

use reqwest::{Client, Response, StatusCode};

use crate::{Credential, ProviderError, ProviderFuture};

use super::serde_api::{GeminiApiResponse, build_api_request, extract_error, map_api_response};
use super::types::{GeminiRequest, GeminiResponse};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

pub trait GeminiTransport: Send + Sync + std::fmt::Debug {
    fn generate<'a>(
        &'a self,
        request: GeminiRequest,
        credential: &'a Credential,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>>;
}

/// Stateless HTTP transport: every call is an independent `generateContent` request.
///
/// Request timeouts come from the supplied [`Client`].
#[derive(Debug, Clone)]
pub struct GeminiHttpTransport {
    client: Client,
    base_url: String,
}

impl GeminiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let api_error = extract_error(&body);
        let message = api_error
            .as_ref()
            .map(|error| error.message.clone())
            .unwrap_or_else(|| format!("Gemini request failed with status {status}"));

        let exhausted = api_error.as_ref().is_some_and(|error| {
            error.code == Some(StatusCode::TOO_MANY_REQUESTS.as_u16())
                || error.status.as_deref() == Some("RESOURCE_EXHAUSTED")
        });

        let error = if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
            ProviderError::rate_limited(format!("rate limit exceeded: {message}"))
        } else {
            match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::authentication(message)
                }
                StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                    ProviderError::timeout(message)
                }
                StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                    ProviderError::invalid_request(message)
                }
                StatusCode::INTERNAL_SERVER_ERROR
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::BAD_GATEWAY => ProviderError::unavailable(message),
                _ => ProviderError::transport(message),
            }
        };

        error.with_http_status(status.as_u16())
    }
}

impl GeminiTransport for GeminiHttpTransport {
    fn generate<'a>(
        &'a self,
        request: GeminiRequest,
        credential: &'a Credential,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>> {
        Box::pin(async move {
            let model = request.model.clone();
            let api_request = build_api_request(request)?;
            let response = self
                .client
                .post(self.endpoint(&model))
                .header(API_KEY_HEADER, credential.expose())
                .json(&api_request)
                .send()
                .await
                .map_err(|err| {
                    if err.is_timeout() {
                        ProviderError::timeout(err.to_string())
                    } else {
                        ProviderError::transport(err.to_string())
                    }
                })?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            let parsed: GeminiApiResponse = response
                .json()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))?;

            Ok(map_api_response(parsed, model))
        })
    }
}

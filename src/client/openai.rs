//! OpenAI-compatible chat completions client.

use super::types::{ApiError, CompletionRequest, CompletionResponse};
use super::{classify_status, GenerationClient};
use crate::error::GenerationError;
use crate::prompt::DirectivePair;
use crate::structured::JsonMode;
use crate::transport::{HttpTransport, TransportConfig, TransportError};
use crate::{Error, Result};
use async_trait::async_trait;

const COMPLETIONS_PATH: &str = "/chat/completions";

/// Generation client for any provider speaking the OpenAI chat completions
/// protocol.
pub struct OpenAiClient {
    transport: HttpTransport,
    json_mode: JsonMode,
}

impl OpenAiClient {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
            json_mode: JsonMode::Json,
        })
    }

    pub fn with_json_mode(mut self, mode: JsonMode) -> Self {
        self.json_mode = mode;
        self
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate(
        &self,
        credential: &str,
        model: &str,
        directives: &DirectivePair,
        temperature: f32,
    ) -> Result<String> {
        let body = CompletionRequest {
            model: model.to_string(),
            messages: directives.to_messages(),
            temperature,
            response_format: self.json_mode.to_openai_format(),
        };
        let body = serde_json::to_value(&body)?;

        let response = self
            .transport
            .post_json(COMPLETIONS_PATH, credential, &body)
            .await?;

        let status = response.status();
        if status.is_success() {
            let parsed: CompletionResponse = response
                .json()
                .await
                .map_err(|e| Error::Transport(TransportError::Http(e)))?;
            return parsed
                .first_text()
                .ok_or(Error::Generation(GenerationError::EmptyContent));
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ApiError>(&error_text)
            .map(|e| e.error.message)
            .unwrap_or(error_text);
        let (class, retryable) = classify_status(status.as_u16());

        tracing::warn!(
            status = status.as_u16(),
            class,
            provider = self.name(),
            "provider returned an error"
        );

        Err(Error::Remote {
            status: status.as_u16(),
            class: class.to_string(),
            message,
            retryable,
        })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.transport.base_url())
            .field("json_mode", &self.json_mode)
            .finish()
    }
}
